//! Fast hash map type alias.
//!
//! Word tallies are keyed by short strings and are rebuilt on every
//! aggregation run, so the Fx hash from `rustc-hash` is used instead of the
//! standard SipHash. Inputs are local files; denial-of-service resistance
//! is not a concern here.
//!
//! # Examples
//!
//! ```
//! use fleet_core::{FxHashMap, fx_hash_map};
//!
//! let mut counts: FxHashMap<String, u64> = fx_hash_map();
//! *counts.entry("word".to_owned()).or_insert(0) += 1;
//! assert_eq!(counts.get("word"), Some(&1));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Creates a new empty [`FxHashMap`].
///
/// Equivalent to `FxHashMap::default()`, but reads better where the type
/// is inferred from the binding.
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without
/// reallocating.
///
/// # Examples
///
/// ```
/// use fleet_core::fx_hash_map_with_capacity;
///
/// let map: fleet_core::FxHashMap<String, u64> = fx_hash_map_with_capacity(64);
/// assert!(map.capacity() >= 64);
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
