//! Recipe-driven settings import
//!
//! A recipe step carries a settings fragment for one settings group. The
//! fragment is deep-merged on top of the stored group, projected onto the
//! group's typed model, and every sensitive field is resolved according to
//! the handler its property is tagged with before the group is written back.
//!
//! Secrets never reach the settings store in plain text: they are encrypted
//! with a purpose-scoped key derived by [`DataProtector`].

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod executor;
pub mod memory_store;
pub mod merge;
pub mod property;
pub mod protector;
pub mod recipe;
pub mod secure_step;
pub mod smtp;

mod prelude;

pub use classify::{Classification, FieldError};
pub use executor::{RecipeExecutor, RecipeReport};
pub use memory_store::MemorySettingsStore;
pub use merge::{merge_fragment, merge_into};
pub use property::{Property, PropertyHandler};
pub use protector::DataProtector;
pub use recipe::{FieldFailure, Recipe, RecipeStep, RecipeStepHandler, StepReport};
pub use secure_step::{SecureSettings, SecureSettingsStep};
pub use smtp::{SmtpSettings, SmtpSettingsStep};

// vim: ts=4
