//! Filesystem settings store
//!
//! Every settings document is a pretty-printed JSON object in
//! `<base_dir>/<name>.json`. Saves go through a temporary file in the same
//! directory followed by a rename, so a crash never leaves a torn document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
	fs::{File, create_dir_all, read, remove_file, rename},
	io::AsyncWriteExt,
};

use lectern::{
	prelude::*,
	settings_store::{SettingsDocument, SettingsStore},
	utils::{random_id, validate_name},
};

fn document_path(base_dir: &Path, name: &str) -> LtResult<PathBuf> {
	validate_name(name)?;
	Ok(base_dir.join(format!("{}.json", name)))
}

fn tmp_file_path(base_dir: &Path) -> LtResult<PathBuf> {
	Ok(base_dir.join(format!(".tmp-{}", random_id()?)))
}

#[derive(Debug)]
pub struct SettingsAdapterFs {
	base_dir: Box<Path>,
}

impl SettingsAdapterFs {
	pub async fn new(base_dir: Box<Path>) -> LtResult<Self> {
		create_dir_all(&base_dir).await?;
		Ok(Self { base_dir })
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}
}

#[async_trait]
impl SettingsStore for SettingsAdapterFs {
	/// Loads a settings document, a missing document is empty
	async fn load_settings(&self, name: &str) -> LtResult<SettingsDocument> {
		let path = document_path(&self.base_dir, name)?;
		let data = match read(&path).await {
			Ok(data) => data,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				debug!("settings document {:?} not found, starting empty", &path);
				return Ok(SettingsDocument::new());
			}
			Err(err) => Err(err)?,
		};

		let document: SettingsDocument = serde_json::from_slice(&data).inspect_err(|err| {
			warn!("settings document {:?} is not a JSON object: {}", &path, err);
		})?;
		Ok(document)
	}

	/// Replaces a settings document
	async fn save_settings(&self, name: &str, document: &SettingsDocument) -> LtResult<()> {
		let path = document_path(&self.base_dir, name)?;
		let data = serde_json::to_vec_pretty(document)?;

		let tmp_path = tmp_file_path(&self.base_dir)?;
		let res = async {
			let mut file = File::create(&tmp_path).await?;
			file.write_all(&data).await?;
			file.sync_all().await?;
			rename(&tmp_path, &path).await?;
			Ok::<(), Error>(())
		}
		.await;
		if let Err(err) = res {
			warn!("saving settings document {:?} failed: {}", &path, err);
			let _ = remove_file(&tmp_path).await;
			return Err(err);
		}

		info!("settings document saved: {:?}", &path);
		Ok(())
	}
}


// vim: ts=4
