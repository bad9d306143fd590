//! Sensitive field classification
//!
//! Decides, per field and per import, what to persist for a secret based on
//! the handler its property was tagged with:
//!
//! ```text
//! UserSupplied, value empty  -> Failed(MissingSecret), no write
//! UserSupplied, value set    -> encrypt -> Store
//! PlainText (even empty)     -> encrypt -> Store
//! Encrypted, empty           -> Skip, no write
//! Encrypted, decrypt ok      -> re-encrypt -> Store
//! Encrypted, decrypt fails   -> Failed(Decrypt), no write
//! ```

use lectern_types::secret_cipher::{DecryptError, Protector};

use crate::prelude::*;
use crate::property::{Property, PropertyHandler};
use crate::secure_step::SecureSettings;

/// Why a sensitive field could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
	/// A user supplied value was required but not provided
	MissingSecret,
	/// An encrypted value could not be decrypted under the expected purpose
	Decrypt(DecryptError),
	/// The value could not be encrypted
	Encrypt(String),
	/// The property metadata itself is malformed
	InvalidProperty(String),
}

impl std::fmt::Display for FieldError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldError::MissingSecret => write!(f, "user supplied value not provided"),
			FieldError::Decrypt(err) => write!(f, "{}", err),
			FieldError::Encrypt(msg) => write!(f, "encryption failed: {}", msg),
			FieldError::InvalidProperty(msg) => write!(f, "invalid property: {}", msg),
		}
	}
}

impl std::error::Error for FieldError {}

/// Outcome of classifying one sensitive field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
	/// Persist this ciphertext
	Store(String),
	/// Nothing was supplied; keep the stored value
	Skip,
	/// Keep the stored value and report the failure
	Failed(FieldError),
}

fn protect(protector: &Protector<'_>, plaintext: &str) -> Classification {
	match protector.protect(plaintext) {
		Ok(ciphertext) => Classification::Store(ciphertext),
		Err(err) => Classification::Failed(FieldError::Encrypt(err.to_string())),
	}
}

/// Classify a property value according to its handler
pub fn classify(
	value: Option<&str>,
	handler: PropertyHandler,
	protector: &Protector<'_>,
) -> Classification {
	let supplied = value.filter(|v| !v.is_empty());
	match handler {
		PropertyHandler::UserSupplied => match supplied {
			Some(plaintext) => protect(protector, plaintext),
			None => Classification::Failed(FieldError::MissingSecret),
		},
		PropertyHandler::PlainText => protect(protector, value.unwrap_or_default()),
		PropertyHandler::Encrypted => match supplied {
			None => Classification::Skip,
			Some(ciphertext) => match protector.unprotect(ciphertext) {
				Ok(plaintext) => protect(protector, &plaintext),
				Err(err) => Classification::Failed(FieldError::Decrypt(err)),
			},
		},
	}
}

/// Classify a parsed property
pub fn classify_property(property: &Property, protector: &Protector<'_>) -> Classification {
	classify(property.value.as_deref(), property.handler, protector)
}

/// Write a resolved secret into the typed settings model.
///
/// Only `Store` writes; `Skip` and `Failed` leave the field as it was.
/// Returns whether the model changed.
pub fn resolve_and_apply<T: SecureSettings>(
	model: &mut T,
	field: &str,
	classification: &Classification,
) -> LtResult<bool> {
	let Classification::Store(ciphertext) = classification else {
		return Ok(false);
	};
	let slot = model.secret_slot(field).ok_or_else(|| {
		Error::ValidationError(format!("'{}' is not a sensitive field of {}", field, T::GROUP))
	})?;
	*slot = Some(ciphertext.clone());
	Ok(true)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protector::DataProtector;
	use lectern_types::secret_cipher::SecretCipher;

	const PURPOSE: &str = "TestSettings";

	fn decrypted(cipher: &DataProtector, classification: &Classification) -> Option<String> {
		match classification {
			Classification::Store(ciphertext) => cipher.decrypt(PURPOSE, ciphertext).ok(),
			_ => None,
		}
	}

	#[test]
	fn test_user_supplied_value_is_encrypted() {
		let cipher = DataProtector::generate();
		let protector = cipher.protector(PURPOSE);
		let result = classify(Some("hunter2"), PropertyHandler::UserSupplied, &protector);
		assert!(matches!(&result, Classification::Store(c) if c != "hunter2"));
		assert_eq!(decrypted(&cipher, &result).as_deref(), Some("hunter2"));
	}

	#[test]
	fn test_user_supplied_empty_is_missing() {
		let cipher = DataProtector::generate();
		let protector = cipher.protector(PURPOSE);
		for value in [None, Some("")] {
			assert_eq!(
				classify(value, PropertyHandler::UserSupplied, &protector),
				Classification::Failed(FieldError::MissingSecret)
			);
		}
	}

	#[test]
	fn test_plaintext_empty_is_encrypted() {
		let cipher = DataProtector::generate();
		let protector = cipher.protector(PURPOSE);
		let result = classify(Some(""), PropertyHandler::PlainText, &protector);
		assert_eq!(decrypted(&cipher, &result).as_deref(), Some(""));

		let result = classify(None, PropertyHandler::PlainText, &protector);
		assert_eq!(decrypted(&cipher, &result).as_deref(), Some(""));
	}

	#[test]
	fn test_encrypted_is_reencrypted() {
		let cipher = DataProtector::generate();
		let protector = cipher.protector(PURPOSE);
		let exported = protector.protect("hunter2").unwrap_or_default();

		let result = classify(Some(exported.as_str()), PropertyHandler::Encrypted, &protector);
		assert!(matches!(&result, Classification::Store(c) if *c != exported));
		assert_eq!(decrypted(&cipher, &result).as_deref(), Some("hunter2"));
	}

	#[test]
	fn test_encrypted_wrong_purpose_fails() {
		let cipher = DataProtector::generate();
		let exported = cipher.encrypt("OtherSettings", "hunter2").unwrap_or_default();
		let protector = cipher.protector(PURPOSE);

		let result = classify(Some(exported.as_str()), PropertyHandler::Encrypted, &protector);
		assert!(matches!(result, Classification::Failed(FieldError::Decrypt(_))));
	}

	#[test]
	fn test_encrypted_empty_is_skipped() {
		let cipher = DataProtector::generate();
		let protector = cipher.protector(PURPOSE);
		assert_eq!(classify(Some(""), PropertyHandler::Encrypted, &protector), Classification::Skip);
		assert_eq!(classify(None, PropertyHandler::Encrypted, &protector), Classification::Skip);
	}
}

// vim: ts=4
