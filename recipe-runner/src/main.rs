//! Applies a settings recipe to a settings document on disk.
//!
//! ```text
//! recipe-runner <recipe.json>
//! recipe-runner generate-key
//! ```

use std::{env, path, process::ExitCode, sync::Arc};

use lectern_recipes::{DataProtector, Recipe, RecipeExecutor, SmtpSettingsStep};
use lectern_settings_adapter_fs::SettingsAdapterFs;
use lectern_types::prelude::*;

const DEFAULT_SETTINGS_DIR: &str = "./data/settings";
const DEFAULT_SETTINGS_DOCUMENT: &str = "site";

pub struct Config {
	pub settings_dir: path::PathBuf,
	pub settings_document: String,
	pub data_key: String,
}

impl Config {
	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LtResult<Self> {
		let data_key = lookup("LECTERN_DATA_KEY")
			.filter(|key| !key.trim().is_empty())
			.ok_or_else(|| Error::ConfigError("LECTERN_DATA_KEY is not set".into()))?;
		Ok(Config {
			settings_dir: path::PathBuf::from(
				lookup("LECTERN_SETTINGS_DIR").unwrap_or(DEFAULT_SETTINGS_DIR.to_string()),
			),
			settings_document: lookup("LECTERN_SETTINGS_DOCUMENT")
				.unwrap_or(DEFAULT_SETTINGS_DOCUMENT.to_string()),
			data_key,
		})
	}

	pub fn from_env() -> LtResult<Self> {
		Self::from_lookup(|name| env::var(name).ok())
	}
}

async fn run(config: Config, recipe_path: &str) -> LtResult<bool> {
	let cipher = Arc::new(DataProtector::from_base64(&config.data_key)?);
	let store = Arc::new(SettingsAdapterFs::new(config.settings_dir.clone().into()).await?);

	let text = tokio::fs::read_to_string(recipe_path).await?;
	let recipe = Recipe::from_json(&text)?;

	let mut executor = RecipeExecutor::new();
	executor.register(Arc::new(SmtpSettingsStep::new(
		store,
		cipher,
		config.settings_document.as_str(),
	)));

	let report = executor.execute(&recipe).await?;
	for step in &report.steps {
		for failure in &step.failures {
			error!("{}.{}: {}", step.step, failure.field, failure.error);
		}
	}
	Ok(report.failure_count() == 0)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let Some(arg) = env::args().nth(1) else {
		error!("usage: recipe-runner <recipe.json> | generate-key");
		return ExitCode::from(2);
	};
	if arg == "generate-key" {
		println!("{}", DataProtector::generate().to_base64());
		return ExitCode::SUCCESS;
	}

	let config = match Config::from_env() {
		Ok(config) => config,
		Err(err) => {
			error!("{}", err);
			return ExitCode::from(2);
		}
	};

	match run(config, &arg).await {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => {
			warn!("Recipe '{}' applied with field failures", arg);
			ExitCode::FAILURE
		}
		Err(err) => {
			error!("Recipe '{}' failed: {}", arg, err);
			ExitCode::FAILURE
		}
	}
}


// vim: ts=4
