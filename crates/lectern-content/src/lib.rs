//! Content item document model
//!
//! A content item version carries a schema-less body: an ordered map from
//! facet name to arbitrary JSON. The content type only tells which facets are
//! meaningful; nothing is enforced at write time. Structure is checked at the
//! projection boundary instead, when a facet is read back as a typed value.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod content_item;
pub mod versions;

mod prelude;

pub use content_item::{ContentItem, UNSAVED_ID};
pub use versions::check_versions;

// vim: ts=4
