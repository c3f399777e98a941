//! Hash map helpers
//!
//! Style sheets key definitions by name and are looked up on every style
//! resolution, so they use ahash rather than the default SipHash.

use ahash::RandomState;

/// `HashMap` with the ahash random-state hasher
pub type HashMap<K, V> = std::collections::HashMap<K, V, RandomState>;

/// Create a new `HashMap` with the ahash hasher
///
/// # Example
///
/// ```rust
/// use richtext_core::utils::create_hash_map;
///
/// let mut map = create_hash_map::<String, u32>();
/// map.insert("Arabic".to_string(), 1);
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> HashMap<K, V> {
    HashMap::with_hasher(RandomState::new())
}

/// Create a new `HashMap` with pre-allocated capacity
#[must_use]
pub fn create_hash_map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, RandomState::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_basic_operations() {
        let mut map = create_hash_map::<&str, i32>();
        map.insert("Normal", 1);
        map.insert("Heading 1", 2);
        assert_eq!(map.get("Normal"), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn hash_map_with_capacity_preallocates() {
        let map = create_hash_map_with_capacity::<String, i32>(32);
        assert!(map.capacity() >= 32);
        assert!(map.is_empty());
    }
}
