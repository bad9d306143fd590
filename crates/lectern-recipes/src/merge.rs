//! JSON merge for settings fragments
//!
//! Deep merge semantics, applied when a recipe fragment lands on stored
//! settings:
//! - Nested objects are merged field by field, never replaced wholesale
//! - Keys only present in the target are kept
//! - Keys only present in the patch are added, even when `null`
//! - A `null` patch value never overwrites an existing field
//! - Any other combination (scalars, arrays, differing kinds) is replaced by
//!   the patch value; arrays are not concatenated so replays stay idempotent

use serde_json::{Map, Value};

/// Merge `incoming` on top of `existing`, returning the merged value
pub fn merge_fragment(existing: &Value, incoming: &Value) -> Value {
	let mut merged = existing.clone();
	merge_into(&mut merged, incoming);
	merged
}

/// Deep merge `patch` into `target` in place.
///
/// # Arguments
/// * `target` - The stored document (modified in place)
/// * `patch` - The partial data to merge
pub fn merge_into(target: &mut Value, patch: &Value) {
	if let Value::Object(patch_obj) = patch {
		if let Some(target_obj) = target.as_object_mut() {
			merge_objects(target_obj, patch_obj);
			return;
		}
	}
	if !patch.is_null() {
		*target = patch.clone();
	}
}

fn merge_objects(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
	for (key, patch_value) in patch {
		match target.get_mut(key) {
			Some(existing) => merge_into(existing, patch_value),
			None => {
				target.insert(key.clone(), patch_value.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_simple_merge() {
		let merged = merge_fragment(&json!({"a": 1, "b": 2}), &json!({"b": 3, "c": 4}));
		assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
	}

	#[test]
	fn test_nested_object_merged_not_replaced() {
		let existing = json!({
			"Host": "smtp.example.com",
			"Auth": {"UserName": "mailer", "Password": "CIPHER"}
		});
		let incoming = json!({"Auth": {"UserName": "robot"}});
		let merged = merge_fragment(&existing, &incoming);
		assert_eq!(
			merged,
			json!({
				"Host": "smtp.example.com",
				"Auth": {"UserName": "robot", "Password": "CIPHER"}
			})
		);
	}

	#[test]
	fn test_null_does_not_overwrite() {
		let merged = merge_fragment(&json!({"a": 1, "b": 2}), &json!({"b": null}));
		assert_eq!(merged, json!({"a": 1, "b": 2}));
	}

	#[test]
	fn test_null_new_key_is_added() {
		let merged = merge_fragment(&json!({"a": 1}), &json!({"b": null}));
		assert_eq!(merged, json!({"a": 1, "b": null}));
	}

	#[test]
	fn test_array_replaced_not_merged() {
		let merged = merge_fragment(&json!({"tags": ["a", "b", "c"]}), &json!({"tags": ["x"]}));
		assert_eq!(merged, json!({"tags": ["x"]}));
	}

	#[test]
	fn test_kind_change_replaces() {
		let merged = merge_fragment(&json!({"a": "text"}), &json!({"a": {"b": 1}}));
		assert_eq!(merged, json!({"a": {"b": 1}}));

		let merged = merge_fragment(&json!({"a": {"b": 1}}), &json!({"a": 5}));
		assert_eq!(merged, json!({"a": 5}));
	}

	#[test]
	fn test_non_object_target_replaced() {
		let merged = merge_fragment(&Value::Null, &json!({"a": 1}));
		assert_eq!(merged, json!({"a": 1}));
	}

	#[test]
	fn test_empty_patch() {
		let merged = merge_fragment(&json!({"a": 1, "b": 2}), &json!({}));
		assert_eq!(merged, json!({"a": 1, "b": 2}));
	}

	#[test]
	fn test_merge_is_idempotent() {
		let existing = json!({"a": {"b": [1, 2]}, "c": 1});
		let incoming = json!({"a": {"b": [3], "d": true}});
		let once = merge_fragment(&existing, &incoming);
		let twice = merge_fragment(&once, &incoming);
		assert_eq!(once, twice);
	}

	#[test]
	fn test_merge_is_associative() {
		let a = json!({"Host": "a", "Auth": {"UserName": "u1"}, "Port": 25});
		let b = json!({"Auth": {"Password": "p"}, "Tags": ["x"]});
		let c = json!({"Host": "c", "Auth": {"UserName": "u3", "Extra": {"k": 1}}, "Tags": ["y"]});

		let left = merge_fragment(&merge_fragment(&a, &b), &c);
		let right = merge_fragment(&a, &merge_fragment(&b, &c));
		assert_eq!(left, right);
	}

	#[test]
	fn test_key_order_kept() {
		let merged = merge_fragment(&json!({"z": 1, "a": 2}), &json!({"m": 3, "z": 4}));
		let keys: Vec<&String> = merged.as_object().map(|o| o.keys().collect()).unwrap_or_default();
		assert_eq!(keys, vec!["z", "a", "m"]);
	}
}

// vim: ts=4
