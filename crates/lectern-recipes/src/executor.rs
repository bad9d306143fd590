//! Recipe executor
//!
//! Feeds every step of a recipe to the registered step handlers. A step error
//! stops the recipe; field-level failures are collected in the step reports.

use std::sync::Arc;

use crate::prelude::*;
use crate::recipe::{Recipe, RecipeStepHandler, StepReport};

/// Result of running a whole recipe
#[derive(Debug, Clone, Default)]
pub struct RecipeReport {
	pub recipe: String,
	pub steps: Vec<StepReport>,
	/// Steps no handler picked up
	pub unhandled: Vec<String>,
}

impl RecipeReport {
	/// True if every step was handled and no field failed
	pub fn is_clean(&self) -> bool {
		self.unhandled.is_empty() && self.steps.iter().all(StepReport::is_clean)
	}

	pub fn failure_count(&self) -> usize {
		self.steps.iter().map(|s| s.failures.len()).sum()
	}
}

#[derive(Debug, Default)]
pub struct RecipeExecutor {
	handlers: Vec<Arc<dyn RecipeStepHandler>>,
}

impl RecipeExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, handler: Arc<dyn RecipeStepHandler>) -> &mut Self {
		debug!("Registering recipe step handler {:?}", handler);
		self.handlers.push(handler);
		self
	}

	pub async fn execute(&self, recipe: &Recipe) -> LtResult<RecipeReport> {
		let mut report = RecipeReport { recipe: recipe.name.clone(), ..Default::default() };
		info!("Executing recipe '{}'", recipe.name);

		for step in recipe.recipe_steps()? {
			let mut handled = false;
			for handler in self.handlers.iter().filter(|h| h.name_matches(&step.name)) {
				if let Some(step_report) = handler.execute(&step).await.inspect_err(|err| {
					error!("Recipe '{}' step '{}' failed: {}", recipe.name, step.name, err);
				})? {
					handled = true;
					report.steps.push(step_report);
				}
			}
			if !handled {
				warn!("No handler for step '{}' in recipe '{}'", step.name, recipe.name);
				report.unhandled.push(step.name);
			}
		}

		info!(
			"Recipe '{}' finished: {} step(s), {} field failure(s), {} unhandled",
			recipe.name,
			report.steps.len(),
			report.failure_count(),
			report.unhandled.len()
		);
		Ok(report)
	}
}

// vim: ts=4
