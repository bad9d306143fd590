//! Version set invariants
//!
//! The flags on a version row are maintained by the versioning workflow, not
//! derived here. This only checks that a set of rows for one logical item is
//! consistent.

use std::collections::HashSet;

use crate::content_item::{ContentItem, UNSAVED_ID};
use crate::prelude::*;

/// Validate the versions of a single logical content item.
///
/// - all rows share one `content_item_id`
/// - `id` and `number` are unique (unsaved rows carrying `UNSAVED_ID` are
///   not checked for id uniqueness)
/// - at most one row is published
/// - exactly one row is latest
pub fn check_versions(versions: &[ContentItem]) -> LtResult<()> {
	let Some(first) = versions.first() else {
		return Ok(());
	};

	let mut ids = HashSet::new();
	let mut numbers = HashSet::new();
	let mut published = 0;
	let mut latest = 0;

	for version in versions {
		if version.content_item_id != first.content_item_id {
			return Err(Error::ValidationError(format!(
				"Version {} belongs to content item '{}', expected '{}'",
				version.number, version.content_item_id, first.content_item_id
			)));
		}
		if version.id != UNSAVED_ID && !ids.insert(version.id) {
			return Err(Error::ValidationError(format!("Duplicate version id {}", version.id)));
		}
		if !numbers.insert(version.number) {
			return Err(Error::ValidationError(format!(
				"Duplicate version number {} for content item '{}'",
				version.number, first.content_item_id
			)));
		}
		if version.published {
			published += 1;
		}
		if version.latest {
			latest += 1;
		}
	}

	if published > 1 {
		return Err(Error::ValidationError(format!(
			"Content item '{}' has {} published versions",
			first.content_item_id, published
		)));
	}
	if latest != 1 {
		return Err(Error::ValidationError(format!(
			"Content item '{}' has {} latest versions, expected exactly one",
			first.content_item_id, latest
		)));
	}
	Ok(())
}

// vim: ts=4
