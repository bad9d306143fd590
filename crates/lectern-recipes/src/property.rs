//! Recipe properties
//!
//! A recipe can attach metadata to a sensitive setting telling how its value
//! was supplied. Properties live in the step's `properties` tree, keyed like
//! the settings they describe (e.g. `SmtpSettings.Password`), and are never
//! persisted themselves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lectern_types::json_path;

use crate::prelude::*;

/// How a property value was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyHandler {
	/// Typed in by an operator at deploy time; must be present
	UserSupplied,
	/// Plaintext written by the recipe author
	PlainText,
	/// Ciphertext from a previous export
	Encrypted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
	#[serde(alias = "handler")]
	pub handler: PropertyHandler,
	#[serde(alias = "value", default)]
	pub value: Option<String>,
}

impl Property {
	pub fn new(handler: PropertyHandler, value: impl Into<String>) -> Self {
		Self { handler, value: Some(value.into()) }
	}

	/// The supplied value, with empty strings treated as absent
	pub fn non_empty_value(&self) -> Option<&str> {
		self.value.as_deref().filter(|v| !v.is_empty())
	}
}

/// Look up the property describing `path` in a properties tree.
///
/// Returns `Ok(None)` if there is no property at `path`, and a
/// `ValidationError` if something is there but is not a valid property.
pub fn lookup(properties: &Value, path: &str) -> LtResult<Option<Property>> {
	let Some(value) = json_path::try_get_value(properties, path) else {
		return Ok(None);
	};
	if value.is_null() {
		return Ok(None);
	}
	Property::deserialize(value)
		.map(Some)
		.map_err(|err| Error::ValidationError(format!("Invalid property '{}': {}", path, err)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_lookup_nested_property() {
		let properties = json!({
			"SmtpSettings": {
				"Password": {"Handler": "Encrypted", "Value": "CfDJ8"}
			}
		});
		let prop = lookup(&properties, "SmtpSettings.Password").ok().flatten();
		assert_eq!(prop, Some(Property::new(PropertyHandler::Encrypted, "CfDJ8")));
	}

	#[test]
	fn test_lookup_missing_property() {
		let properties = json!({"SmtpSettings": {}});
		assert!(matches!(lookup(&properties, "SmtpSettings.Password"), Ok(None)));
		assert!(matches!(lookup(&Value::Null, "SmtpSettings.Password"), Ok(None)));
	}

	#[test]
	fn test_lookup_accepts_lowercase_keys_and_missing_value() {
		let properties = json!({"S": {"P": {"handler": "UserSupplied"}}});
		let prop = lookup(&properties, "S.P").ok().flatten();
		assert_eq!(prop, Some(Property { handler: PropertyHandler::UserSupplied, value: None }));
	}

	#[test]
	fn test_lookup_unknown_handler() {
		let properties = json!({"S": {"P": {"Handler": "Hashed", "Value": "x"}}});
		assert!(matches!(lookup(&properties, "S.P"), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_non_empty_value() {
		assert_eq!(Property::new(PropertyHandler::PlainText, "").non_empty_value(), None);
		assert_eq!(Property::new(PropertyHandler::PlainText, "x").non_empty_value(), Some("x"));
	}
}

// vim: ts=4
