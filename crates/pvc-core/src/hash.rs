//! Fast hash map and hash set type aliases.
//!
//! Catalog grouping is keyed by short normalized strings (canonical product
//! names, slugs, version keys). The Fx hash from `rustc-hash` is a good fit for
//! those keys; none of the inputs are attacker controlled.
//!
//! # Examples
//!
//! ```
//! use pvc_core::{FxHashMap, fx_hash_map};
//!
//! let mut by_name: FxHashMap<String, usize> = fx_hash_map();
//! by_name.insert("winforms".to_owned(), 0);
//! assert_eq!(by_name.get("winforms"), Some(&0));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without reallocating.
///
/// # Examples
///
/// ```
/// use pvc_core::fx_hash_map_with_capacity;
///
/// let map: pvc_core::FxHashMap<String, i32> = fx_hash_map_with_capacity(64);
/// assert!(map.capacity() >= 64);
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, usize> = fx_hash_map();
        map.insert("2025v1", 0);
        map.insert("2025v2", 1);
        assert_eq!(map.get("2025v1"), Some(&0));
        assert_eq!(map.get("2026v1"), None);
    }

    #[test]
    fn test_fx_hash_set_dedup() {
        let mut set: FxHashSet<String> = FxHashSet::default();
        assert!(set.insert("2025v2".to_owned()));
        assert!(!set.insert("2025v2".to_owned()));
    }
}
