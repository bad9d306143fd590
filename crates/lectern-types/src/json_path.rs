//! Dot-notation path access into JSON documents
//!
//! Paths are dot-separated keys (e.g. `"TitlePart.Title"`). When reading, a
//! segment that parses as a number indexes into an array. Writing only walks
//! objects and creates missing intermediate objects on the way.

use serde_json::{Map, Value};

use crate::prelude::*;

/// Split a dot-notation path into its segments, rejecting empty segments
fn segments(path: &str) -> LtResult<Vec<&str>> {
	let parts: Vec<&str> = path.split('.').collect();
	if parts.iter().any(|p| p.is_empty()) {
		return Err(Error::ValidationError(format!("Invalid path '{}'", path)));
	}
	Ok(parts)
}

/// Look up a path inside a JSON object. Missing keys, out-of-range indexes and
/// malformed paths all yield `None`.
pub fn try_get<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
	let parts = segments(path).ok()?;
	let (first, rest) = parts.split_first()?;
	let mut current = root.get(*first)?;
	for part in rest {
		current = match current {
			Value::Object(obj) => obj.get(*part)?,
			Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}
	Some(current)
}

/// Same as [`try_get`] but starting from an arbitrary value
pub fn try_get_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
	root.as_object().and_then(|obj| try_get(obj, path))
}

/// Set the value at a path, creating intermediate objects if needed.
///
/// # Errors
/// Returns `ValidationError` if the path is malformed or an intermediate field
/// exists but is not an object.
pub fn set(root: &mut Map<String, Value>, path: &str, value: Value) -> LtResult<()> {
	let parts = segments(path)?;
	let Some((last, parents)) = parts.split_last() else {
		return Ok(());
	};

	let mut current = root;
	for &part in parents {
		let entry = current.entry(part.to_string()).or_insert_with(|| Value::Object(Map::new()));
		if let Some(obj) = entry.as_object_mut() {
			current = obj;
		} else {
			return Err(Error::ValidationError(format!(
				"Cannot set '{}': field '{}' is not an object",
				path, part
			)));
		}
	}

	current.insert((*last).to_string(), value);
	Ok(())
}

/// Remove the value at a path, returning it. Missing paths return `None`.
pub fn remove(root: &mut Map<String, Value>, path: &str) -> Option<Value> {
	let parts = segments(path).ok()?;
	let (last, parents) = parts.split_last()?;

	let mut current = root;
	for part in parents {
		current = current.get_mut(*part)?.as_object_mut()?;
	}
	current.shift_remove(*last)
}


// vim: ts=4
