//! Shared types, capability traits, and core utilities for Lectern.
//!
//! This crate holds what both the content model and the recipe engine need:
//! the workspace error type, the settings store and secret cipher traits the
//! engine consumes as capabilities, and the JSON path helpers used to address
//! schema-less documents.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod json_path;
pub mod prelude;
pub mod secret_cipher;
pub mod settings_store;
pub mod utils;

// vim: ts=4
