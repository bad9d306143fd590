//! Content item version
//!
//! One row per version of a logical content item. All versions of an item
//! share `content_item_id`; `number` orders them. The `published` and
//! `latest` flags are stored as they are, the versioning workflow that flips
//! them lives elsewhere.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use lectern_types::{json_path, utils};

use crate::prelude::*;

/// Id of a version that has not been stored yet; the store assigns the real one
pub const UNSAVED_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
	/// Unique identifier of this version, `UNSAVED_ID` until stored
	pub id: i64,
	/// Identifier shared by all versions of the item
	pub content_item_id: Box<str>,
	pub content_type: Box<str>,
	/// Version ordinal within `content_item_id`
	pub number: u32,
	pub published: bool,
	pub latest: bool,
	#[serde(rename = "content", default)]
	data: Map<String, Value>,
}

impl ContentItem {
	/// Create the first version of a new content item with an empty body
	pub fn new(content_type: impl Into<Box<str>>) -> LtResult<Self> {
		Ok(Self {
			id: UNSAVED_ID,
			content_item_id: utils::random_id()?.into(),
			content_type: content_type.into(),
			number: 1,
			published: false,
			latest: true,
			data: Map::new(),
		})
	}

	/// The document body
	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	/// Names of the top-level facets, in insertion order
	pub fn facets(&self) -> impl Iterator<Item = &str> {
		self.data.keys().map(String::as_str)
	}

	/// Read a facet or a nested path inside one. Absent paths yield `None`.
	pub fn get(&self, path: &str) -> Option<&Value> {
		json_path::try_get(&self.data, path)
	}

	pub fn has(&self, path: &str) -> bool {
		self.get(path).is_some()
	}

	/// Write a facet or nested value, creating intermediate objects
	pub fn set(&mut self, path: &str, value: Value) -> LtResult<()> {
		json_path::set(&mut self.data, path, value)
	}

	/// Serialize a typed facet into the body
	pub fn put<T: Serialize>(&mut self, path: &str, facet: &T) -> LtResult<()> {
		let value = serde_json::to_value(facet).map_err(|err| {
			Error::ValidationError(format!("Cannot serialize facet '{}': {}", path, err))
		})?;
		self.set(path, value)
	}

	pub fn remove(&mut self, path: &str) -> Option<Value> {
		json_path::remove(&mut self.data, path)
	}

	/// Project a facet subtree onto a typed shape.
	///
	/// Unknown fields are ignored. A missing required field, a type mismatch
	/// or an absent facet is a `ProjectionError`.
	pub fn as_typed<T: DeserializeOwned>(&self, path: &str) -> LtResult<T> {
		let value = self
			.get(path)
			.ok_or_else(|| Error::ProjectionError(format!("Facet '{}' is not present", path)))?;
		T::deserialize(value)
			.map_err(|err| Error::ProjectionError(format!("Facet '{}': {}", path, err)))
	}

	/// Start the next version of this item.
	///
	/// The new version is an unpublished draft holding a copy of the body and
	/// becomes the latest one; this version loses its `latest` flag.
	pub fn new_version(&mut self) -> LtResult<ContentItem> {
		let number = self.number.checked_add(1).ok_or_else(|| {
			Error::ValidationError(format!(
				"Content item '{}' has no version number left",
				self.content_item_id
			))
		})?;
		self.latest = false;
		debug!("New version {} of content item {}", number, self.content_item_id);
		Ok(ContentItem {
			id: UNSAVED_ID,
			content_item_id: self.content_item_id.clone(),
			content_type: self.content_type.clone(),
			number,
			published: false,
			latest: true,
			data: self.data.clone(),
		})
	}

	pub fn publish(&mut self) {
		self.published = true;
	}

	pub fn unpublish(&mut self) {
		self.published = false;
	}
}

impl Default for ContentItem {
	fn default() -> Self {
		Self {
			id: 0,
			content_item_id: "".into(),
			content_type: "".into(),
			number: 0,
			published: false,
			latest: false,
			data: Map::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_fresh_item_has_empty_body() {
		let item = ContentItem::default();
		assert!(item.data().is_empty());
		assert_eq!(item.get("anything"), None);
		assert_eq!(item.get("anything.nested"), None);

		let created = ContentItem::new("Article");
		assert!(created.is_ok());
		if let Ok(item) = created {
			assert!(item.data().is_empty());
			assert_eq!(item.get("anything"), None);
			assert!(!item.has("anything"));
			assert_eq!(item.facets().count(), 0);
		}
	}

	#[test]
	fn test_new_assigns_identity() {
		let item = ContentItem::new("Article").unwrap_or_default();
		assert_eq!(item.content_item_id.len(), utils::ID_LENGTH);
		assert_eq!(item.number, 1);
		assert!(item.latest);
		assert!(!item.published);
		assert_eq!(item.facets().count(), 0);
	}

	#[test]
	fn test_set_then_get_nested() {
		let mut item = ContentItem::default();
		assert!(item.set("TitlePart.Title", json!("Hello")).is_ok());
		assert_eq!(item.get("TitlePart.Title"), Some(&json!("Hello")));
		assert_eq!(item.get("TitlePart"), Some(&json!({"Title": "Hello"})));
		assert!(item.has("TitlePart"));
		assert!(!item.has("BodyPart"));
	}

	#[test]
	fn test_remove_facet() {
		let mut item = ContentItem::default();
		assert!(item.set("TitlePart", json!({"Title": "Hello"})).is_ok());
		assert_eq!(item.remove("TitlePart"), Some(json!({"Title": "Hello"})));
		assert!(item.data().is_empty());
		assert_eq!(item.remove("TitlePart"), None);
	}

	#[test]
	fn test_new_version_moves_latest_flag() {
		let mut first = ContentItem::default();
		first.latest = true;
		first.number = 1;
		first.publish();
		assert!(first.set("TitlePart.Title", json!("v1")).is_ok());

		let second = first.new_version().unwrap_or_default();
		assert!(!first.latest);
		assert!(first.published);
		assert!(second.latest);
		assert!(!second.published);
		assert_eq!(second.number, 2);
		assert_eq!(second.get("TitlePart.Title"), Some(&json!("v1")));
		assert_eq!(second.id, UNSAVED_ID);
	}

	#[test]
	fn test_new_version_number_overflow() {
		let mut last = ContentItem { number: u32::MAX, latest: true, ..Default::default() };
		assert!(matches!(last.new_version(), Err(Error::ValidationError(_))));
		// Nothing changes on failure
		assert!(last.latest);
	}
}

// vim: ts=4
