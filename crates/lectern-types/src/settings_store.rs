//! Settings store capability
//!
//! A settings document is a JSON object mapping setting-group names
//! (e.g. `"SmtpSettings"`) to arbitrary nested structure. Stores load and save
//! whole documents; concurrent writers to the same document are the store's
//! responsibility to serialize.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::prelude::*;

pub type SettingsDocument = Map<String, Value>;

#[async_trait]
pub trait SettingsStore: Debug + Send + Sync {
	/// Load the settings document `name`. A document that was never saved is
	/// returned as an empty map.
	async fn load_settings(&self, name: &str) -> LtResult<SettingsDocument>;

	/// Replace the settings document `name`
	async fn save_settings(&self, name: &str, document: &SettingsDocument) -> LtResult<()>;
}

// vim: ts=4
