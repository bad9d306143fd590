//! Secure settings import step
//!
//! Imports one settings group from a recipe step:
//!
//! 1. load the settings document (one store read)
//! 2. deep-merge the step's fragment, minus its sensitive fields, on top of
//!    the stored group
//! 3. project the merged fragment onto the typed model
//! 4. classify every sensitive field that has a property and apply it
//! 5. write the model back and save the document (one store write)
//!
//! A field that fails classification is logged and reported, and keeps its
//! stored value; the other fields of the step are still saved.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

use lectern_types::secret_cipher::{Protector, SecretCipher};
use lectern_types::settings_store::SettingsStore;

use crate::classify::{Classification, FieldError, classify_property, resolve_and_apply};
use crate::merge::merge_into;
use crate::prelude::*;
use crate::property;
use crate::recipe::{FieldFailure, RecipeStep, RecipeStepHandler, StepReport};

/// A typed settings group with secret fields
pub trait SecureSettings: Serialize + DeserializeOwned + Send + Sync {
	/// Settings group name, also the name of the recipe step importing it
	const GROUP: &'static str;
	/// Data protection purpose the secrets of this group are encrypted under
	const PURPOSE: &'static str;
	/// Fields holding ciphertext
	const SENSITIVE_FIELDS: &'static [&'static str];

	/// Mutable access to the stored ciphertext of a sensitive field
	fn secret_slot(&mut self, field: &str) -> Option<&mut Option<String>>;

	/// Check cross-field constraints after projection
	fn validate(&self) -> LtResult<()> {
		Ok(())
	}
}

pub struct SecureSettingsStep<T> {
	store: Arc<dyn SettingsStore>,
	cipher: Arc<dyn SecretCipher>,
	document: Box<str>,
	_settings: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for SecureSettingsStep<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SecureSettingsStep")
			.field("group", &std::any::type_name::<T>())
			.field("document", &self.document)
			.finish_non_exhaustive()
	}
}

impl<T: SecureSettings> SecureSettingsStep<T> {
	/// Create a step importing into the settings document `document`
	pub fn new(
		store: Arc<dyn SettingsStore>,
		cipher: Arc<dyn SecretCipher>,
		document: impl Into<Box<str>>,
	) -> Self {
		Self { store, cipher, document: document.into(), _settings: PhantomData }
	}

	/// Project a merged fragment onto the typed model
	pub fn project(fragment: &Value) -> LtResult<T> {
		let model = T::deserialize(fragment)
			.map_err(|err| Error::ProjectionError(format!("{}: {}", T::GROUP, err)))?;
		model.validate()?;
		Ok(model)
	}

	/// Copy of a step fragment with the sensitive fields removed.
	///
	/// Secrets only change through their properties; a value carried in the
	/// step body itself is dropped.
	fn without_secrets(fragment: &Value) -> Value {
		let mut fragment = fragment.clone();
		if let Some(obj) = fragment.as_object_mut() {
			for field in T::SENSITIVE_FIELDS {
				if obj.shift_remove(*field).is_some() {
					warn!(
						"Ignoring '{}' in the '{}' step body, secrets are only taken from properties",
						field,
						T::GROUP
					);
				}
			}
		}
		fragment
	}

	/// Resolve every sensitive field that has a property attached
	fn apply_properties(&self, model: &mut T, properties: &Value, report: &mut StepReport) {
		let protector = Protector::new(self.cipher.as_ref(), T::PURPOSE);

		for field in T::SENSITIVE_FIELDS {
			let path = format!("{}.{}", T::GROUP, field);
			let classification = match property::lookup(properties, &path) {
				Ok(Some(prop)) => classify_property(&prop, &protector),
				Ok(None) => continue,
				Err(err) => Classification::Failed(FieldError::InvalidProperty(err.to_string())),
			};

			match resolve_and_apply(model, field, &classification) {
				Ok(true) => {
					debug!("Setting '{}' of '{}' resolved", field, T::GROUP);
					report.applied.push((*field).to_string());
				}
				Ok(false) => {
					if let Classification::Failed(error) = classification {
						match &error {
							FieldError::MissingSecret => error!(
								"User supplied setting '{}' not provided for '{}'",
								field,
								T::GROUP
							),
							FieldError::Decrypt(_) => error!(
								"The {} setting '{}' could not be decrypted. It may have been encrypted using a different key.",
								T::GROUP,
								field
							),
							_ => error!("Setting '{}' of '{}' not applied: {}", field, T::GROUP, error),
						}
						report.failures.push(FieldFailure { field: (*field).to_string(), error });
					} else {
						debug!("Setting '{}' of '{}' not supplied, keeping stored value", field, T::GROUP);
						report.skipped.push((*field).to_string());
					}
				}
				Err(err) => {
					error!("Setting '{}' of '{}' not applied: {}", field, T::GROUP, err);
					report.failures.push(FieldFailure {
						field: (*field).to_string(),
						error: FieldError::InvalidProperty(err.to_string()),
					});
				}
			}
		}
	}

	/// Run the import for one step payload
	pub async fn import(&self, step: &RecipeStep) -> LtResult<StepReport> {
		let mut report = StepReport::new(step.name.as_str());
		let mut document = self.store.load_settings(&self.document).await?;

		let mut merged = document
			.get(T::GROUP)
			.filter(|v| v.is_object())
			.cloned()
			.unwrap_or_else(|| Value::Object(Map::new()));
		if let Some(fragment) = step.step.get(T::GROUP) {
			merge_into(&mut merged, &Self::without_secrets(fragment));
		}

		let mut model = Self::project(&merged)?;
		self.apply_properties(&mut model, &step.properties, &mut report);

		let resolved = serde_json::to_value(&model)
			.map_err(|err| Error::Internal(format!("Cannot serialize {}: {}", T::GROUP, err)))?;
		merge_into(&mut merged, &resolved);
		document.insert(T::GROUP.to_string(), merged);

		self.store.save_settings(&self.document, &document).await?;

		if report.is_clean() {
			info!("Imported '{}' into settings '{}'", T::GROUP, self.document);
		} else {
			warn!(
				"Imported '{}' into settings '{}' with {} failed field(s)",
				T::GROUP,
				self.document,
				report.failures.len()
			);
		}
		Ok(report)
	}
}

#[async_trait]
impl<T: SecureSettings> RecipeStepHandler for SecureSettingsStep<T> {
	fn name_matches(&self, name: &str) -> bool {
		name.eq_ignore_ascii_case(T::GROUP)
	}

	async fn execute(&self, step: &RecipeStep) -> LtResult<Option<StepReport>> {
		if !self.name_matches(&step.name) {
			return Ok(None);
		}
		self.import(step).await.map(Some)
	}
}

// vim: ts=4
