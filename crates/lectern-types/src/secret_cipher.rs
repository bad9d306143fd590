//! Secret cipher capability
//!
//! Symmetric data protection scoped by a *purpose* string. Ciphertext produced
//! under one purpose must never decrypt under another, so a secret exported
//! for one settings group cannot be replayed into a different one.

use std::fmt::Debug;

use crate::prelude::*;

/// Error returned when a ciphertext cannot be decrypted: wrong key, wrong
/// purpose, or a corrupted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptError {
	pub purpose: Box<str>,
	pub message: String,
}

impl std::fmt::Display for DecryptError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "cannot decrypt secret for '{}': {}", self.purpose, self.message)
	}
}

impl std::error::Error for DecryptError {}

pub trait SecretCipher: Debug + Send + Sync {
	/// Encrypt `plaintext` under `purpose`. Encryption may be
	/// non-deterministic: two calls can return different ciphertexts.
	fn encrypt(&self, purpose: &str, plaintext: &str) -> LtResult<String>;

	/// Decrypt a ciphertext previously produced under the same `purpose`
	fn decrypt(&self, purpose: &str, ciphertext: &str) -> Result<String, DecryptError>;

	/// Bind this cipher to a purpose
	fn protector<'a>(&'a self, purpose: &'a str) -> Protector<'a>
	where
		Self: Sized,
	{
		Protector { cipher: self, purpose }
	}
}

/// A cipher bound to one purpose
#[derive(Debug, Clone, Copy)]
pub struct Protector<'a> {
	cipher: &'a dyn SecretCipher,
	purpose: &'a str,
}

impl<'a> Protector<'a> {
	pub fn new(cipher: &'a dyn SecretCipher, purpose: &'a str) -> Self {
		Self { cipher, purpose }
	}

	pub fn purpose(&self) -> &str {
		self.purpose
	}

	pub fn protect(&self, plaintext: &str) -> LtResult<String> {
		self.cipher.encrypt(self.purpose, plaintext)
	}

	pub fn unprotect(&self, ciphertext: &str) -> Result<String, DecryptError> {
		self.cipher.decrypt(self.purpose, ciphertext)
	}
}

// vim: ts=4
