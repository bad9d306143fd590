//! Purpose-scoped data protection
//!
//! # Algorithms
//!
//! - **Key Derivation**: HMAC-SHA256 of the master key over the purpose string
//! - **Encryption**: ChaCha20-Poly1305 with a random 96-bit nonce per message;
//!   the purpose is bound again as associated data
//!
//! # Format
//!
//! `base64url_nopad(nonce || ciphertext || tag)`. Encryption is
//! non-deterministic, so protecting the same plaintext twice yields two
//! different strings that both unprotect to it.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chacha20poly1305::{
	ChaCha20Poly1305, Key, Nonce,
	aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use lectern_types::secret_cipher::{DecryptError, SecretCipher};

use crate::prelude::*;

/// Master key length (32 bytes)
pub const KEY_LEN: usize = 32;

/// Nonce length for ChaCha20-Poly1305 (12 bytes)
pub const NONCE_LEN: usize = 12;

/// ChaCha20-Poly1305 auth tag length (16 bytes)
pub const TAG_LEN: usize = 16;

const KDF_LABEL: &[u8] = b"lectern.protect.v1:";

pub struct DataProtector {
	master_key: Zeroizing<[u8; KEY_LEN]>,
}

impl std::fmt::Debug for DataProtector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataProtector").field("master_key", &"<redacted>").finish()
	}
}

impl DataProtector {
	pub fn new(master_key: [u8; KEY_LEN]) -> Self {
		Self { master_key: Zeroizing::new(master_key) }
	}

	/// Create a protector with a fresh random master key
	pub fn generate() -> Self {
		let key = ChaCha20Poly1305::generate_key(&mut OsRng);
		let mut master_key = [0u8; KEY_LEN];
		master_key.copy_from_slice(&key);
		Self::new(master_key)
	}

	/// Load a master key encoded as unpadded base64url
	pub fn from_base64(encoded: &str) -> LtResult<Self> {
		let bytes = Zeroizing::new(
			URL_SAFE_NO_PAD
				.decode(encoded.trim())
				.map_err(|_| Error::ConfigError("Data protection key is not valid base64".into()))?,
		);
		if bytes.len() != KEY_LEN {
			return Err(Error::ConfigError(format!(
				"Data protection key must be {} bytes, got {}",
				KEY_LEN,
				bytes.len()
			)));
		}
		let mut master_key = [0u8; KEY_LEN];
		master_key.copy_from_slice(&bytes);
		Ok(Self::new(master_key))
	}

	/// Export the master key as unpadded base64url
	pub fn to_base64(&self) -> String {
		URL_SAFE_NO_PAD.encode(self.master_key.as_ref())
	}

	fn purpose_cipher(&self, purpose: &str) -> LtResult<ChaCha20Poly1305> {
		let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(self.master_key.as_ref())
			.map_err(|_| Error::Internal("Invalid master key length".into()))?;
		mac.update(KDF_LABEL);
		mac.update(purpose.as_bytes());
		let mut subkey = Zeroizing::new([0u8; KEY_LEN]);
		subkey.copy_from_slice(&mac.finalize().into_bytes());
		Ok(ChaCha20Poly1305::new(Key::from_slice(subkey.as_slice())))
	}
}

impl SecretCipher for DataProtector {
	fn encrypt(&self, purpose: &str, plaintext: &str) -> LtResult<String> {
		let cipher = self.purpose_cipher(purpose)?;
		let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
		let ciphertext = cipher
			.encrypt(&nonce, Payload { msg: plaintext.as_bytes(), aad: purpose.as_bytes() })
			.map_err(|_| Error::Internal("Encryption failed".into()))?;

		let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
		out.extend_from_slice(&nonce);
		out.extend_from_slice(&ciphertext);
		Ok(URL_SAFE_NO_PAD.encode(out))
	}

	fn decrypt(&self, purpose: &str, ciphertext: &str) -> Result<String, DecryptError> {
		let fail = |message: &str| DecryptError { purpose: purpose.into(), message: message.into() };

		let bytes = URL_SAFE_NO_PAD.decode(ciphertext).map_err(|_| fail("not valid base64"))?;
		if bytes.len() < NONCE_LEN + TAG_LEN {
			return Err(fail("payload too short"));
		}
		let (nonce, sealed) = bytes.split_at(NONCE_LEN);

		let cipher = self.purpose_cipher(purpose).map_err(|err| fail(&err.to_string()))?;
		let plaintext = Zeroizing::new(
			cipher
				.decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad: purpose.as_bytes() })
				.map_err(|_| fail("authentication failed (wrong key or purpose?)"))?,
		);

		String::from_utf8(plaintext.to_vec()).map_err(|_| fail("plaintext is not valid UTF-8"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip() {
		let protector = DataProtector::generate();
		let sealed = protector.encrypt("SmtpSettings", "hunter2").unwrap_or_default();
		assert_ne!(sealed, "hunter2");
		assert_eq!(protector.decrypt("SmtpSettings", &sealed).ok().as_deref(), Some("hunter2"));
	}

	#[test]
	fn test_empty_plaintext_round_trip() {
		let protector = DataProtector::generate();
		let sealed = protector.encrypt("SmtpSettings", "").unwrap_or_default();
		assert!(!sealed.is_empty());
		assert_eq!(protector.decrypt("SmtpSettings", &sealed).ok().as_deref(), Some(""));
	}

	#[test]
	fn test_encryption_is_not_deterministic() {
		let protector = DataProtector::generate();
		let a = protector.encrypt("p", "secret").unwrap_or_default();
		let b = protector.encrypt("p", "secret").unwrap_or_default();
		assert_ne!(a, b);
	}

	#[test]
	fn test_other_purpose_fails() {
		let protector = DataProtector::generate();
		let sealed = protector.encrypt("SmtpSettings", "hunter2").unwrap_or_default();
		let err = protector.decrypt("TwitterSettings", &sealed);
		assert!(matches!(err, Err(DecryptError { ref purpose, .. }) if purpose.as_ref() == "TwitterSettings"));
	}

	#[test]
	fn test_other_key_fails() {
		let sealed = DataProtector::generate().encrypt("p", "hunter2").unwrap_or_default();
		assert!(DataProtector::generate().decrypt("p", &sealed).is_err());
	}

	#[test]
	fn test_corrupted_payload_fails() {
		let protector = DataProtector::generate();
		assert!(protector.decrypt("p", "not base64 !").is_err());
		assert!(protector.decrypt("p", "c2hvcnQ").is_err());

		let sealed = protector.encrypt("p", "hunter2").unwrap_or_default();
		let mut bytes = URL_SAFE_NO_PAD.decode(&sealed).unwrap_or_default();
		if let Some(last) = bytes.last_mut() {
			*last ^= 0x01;
		}
		assert!(protector.decrypt("p", &URL_SAFE_NO_PAD.encode(bytes)).is_err());
	}

	#[test]
	fn test_key_export_import() {
		let protector = DataProtector::generate();
		let sealed = protector.encrypt("p", "hunter2").unwrap_or_default();
		let restored = DataProtector::from_base64(&protector.to_base64());
		assert_eq!(
			restored.ok().and_then(|p| p.decrypt("p", &sealed).ok()).as_deref(),
			Some("hunter2")
		);
	}

	#[test]
	fn test_invalid_key_rejected() {
		assert!(matches!(DataProtector::from_base64("!!"), Err(Error::ConfigError(_))));
		assert!(matches!(DataProtector::from_base64("c2hvcnQ"), Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_debug_redacts_key() {
		let protector = DataProtector::generate();
		let debug = format!("{:?}", protector);
		assert!(!debug.contains(&protector.to_base64()));
	}
}

// vim: ts=4
