//! Recipes and recipe steps
//!
//! A recipe is a JSON document with a list of named steps. Each step object
//! carries its own payload next to its `name`; the recipe-level `properties`
//! tree holds metadata for sensitive values and is shared by all steps.
//!
//! ```json
//! {
//!   "name": "smtp-production",
//!   "properties": {
//!     "SmtpSettings": { "Password": { "Handler": "UserSupplied", "Value": "..." } }
//!   },
//!   "steps": [
//!     { "name": "SmtpSettings", "SmtpSettings": { "Host": "smtp.example.com" } }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::classify::FieldError;
use crate::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
	pub name: String,
	#[serde(default)]
	pub properties: Value,
	#[serde(default)]
	pub steps: Vec<Value>,
}

impl Recipe {
	pub fn from_json(text: &str) -> LtResult<Self> {
		serde_json::from_str(text)
			.map_err(|err| Error::ValidationError(format!("Invalid recipe: {}", err)))
	}

	/// Materialize the steps of this recipe, in order
	pub fn recipe_steps(&self) -> LtResult<Vec<RecipeStep>> {
		self.steps
			.iter()
			.enumerate()
			.map(|(idx, step)| {
				let name = step.get("name").and_then(Value::as_str).ok_or_else(|| {
					Error::ValidationError(format!("Step #{} of recipe '{}' has no name", idx, self.name))
				})?;
				Ok(RecipeStep {
					name: name.into(),
					step: step.clone(),
					properties: self.properties.clone(),
				})
			})
			.collect()
	}
}

/// One step of a recipe as seen by a step handler
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeStep {
	pub name: String,
	pub step: Value,
	pub properties: Value,
}

impl RecipeStep {
	pub fn new(name: impl Into<String>, step: Value, properties: Value) -> Self {
		Self { name: name.into(), step, properties }
	}
}

/// A sensitive field that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
	pub field: String,
	pub error: FieldError,
}

/// What a step handler did with one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
	pub step: String,
	/// Sensitive fields that were written
	pub applied: Vec<String>,
	/// Sensitive fields that had nothing to apply
	pub skipped: Vec<String>,
	pub failures: Vec<FieldFailure>,
}

impl StepReport {
	pub fn new(step: impl Into<String>) -> Self {
		Self { step: step.into(), ..Default::default() }
	}

	/// True if no field failed
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

#[async_trait]
pub trait RecipeStepHandler: Send + Sync + Debug {
	/// Whether this handler is responsible for steps named `name`
	fn name_matches(&self, name: &str) -> bool;

	/// Execute `step` if this handler is responsible for it.
	///
	/// Returns `Ok(None)` for steps addressed to other handlers. Field-level
	/// problems are reported in the `StepReport`; an `Err` means the step
	/// failed as a whole and nothing was saved.
	async fn execute(&self, step: &RecipeStep) -> LtResult<Option<StepReport>>;
}

// vim: ts=4
