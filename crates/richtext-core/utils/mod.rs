//! Utility modules for richtext-core
//!
//! Shared error type and hashing helpers used by the attribute and style
//! sheet modules, and re-exported for the editor crate.

pub mod errors;
pub mod hashers;

pub use errors::{CoreError, Result};
pub use hashers::{create_hash_map, create_hash_map_with_capacity, HashMap};
