//! Capacity-limited memoization

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Default number of token hashes retained per hasher
pub const DEFAULT_TOKEN_CACHE_CAPACITY: usize = 1 << 16;

/// Default number of token-set signatures retained per sketcher
pub const DEFAULT_SET_CACHE_CAPACITY: usize = 1024;

/// A map that holds at most `capacity` entries, evicting the oldest insert first
///
/// A capacity of 0 disables caching: lookups always miss and inserts are
/// dropped.
#[derive(Clone, Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedCache<K, V> {
    /// Create an empty cache
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a cached value
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Insert a value, evicting the oldest entry when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.map.get_mut(&key) {
            *slot = value;
            return;
        }
        if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
                tracing::trace!(capacity = self.capacity, "cache full, evicted oldest entry");
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    pub fn get_or_insert_with<Q>(&mut self, key: &Q, make: impl FnOnce() -> V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(v) = self.map.get(key) {
            return v.clone();
        }
        let value = make();
        self.insert(key.to_owned(), value.clone());
        value
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}
