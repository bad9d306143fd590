pub use lectern_types::prelude::*;

// vim: ts=4
