//! In-memory settings store
//!
//! Keeps settings documents in a map behind a lock. Used by tests and by
//! embedders that persist settings elsewhere.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use lectern_types::settings_store::{SettingsDocument, SettingsStore};

use crate::prelude::*;

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
	documents: RwLock<HashMap<String, SettingsDocument>>,
	loads: AtomicUsize,
	saves: AtomicUsize,
}

impl MemorySettingsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a document without counting it as a save
	pub fn with_document(self, name: impl Into<String>, document: SettingsDocument) -> Self {
		self.documents.write().insert(name.into(), document);
		self
	}

	/// Snapshot of a stored document
	pub fn document(&self, name: &str) -> Option<SettingsDocument> {
		self.documents.read().get(name).cloned()
	}

	/// Number of `load_settings` calls so far
	pub fn loads(&self) -> usize {
		self.loads.load(Ordering::Relaxed)
	}

	/// Number of `save_settings` calls so far
	pub fn saves(&self) -> usize {
		self.saves.load(Ordering::Relaxed)
	}
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
	async fn load_settings(&self, name: &str) -> LtResult<SettingsDocument> {
		self.loads.fetch_add(1, Ordering::Relaxed);
		Ok(self.documents.read().get(name).cloned().unwrap_or_default())
	}

	async fn save_settings(&self, name: &str, document: &SettingsDocument) -> LtResult<()> {
		self.saves.fetch_add(1, Ordering::Relaxed);
		debug!("Saving settings document '{}' ({} groups)", name, document.len());
		self.documents.write().insert(name.to_string(), document.clone());
		Ok(())
	}
}

// vim: ts=4
