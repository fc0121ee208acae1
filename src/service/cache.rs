//! Bounded answer cache evicted in insertion order.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use tracing::trace;

/// Remembers the answers to the last `capacity` distinct keys.
///
/// Eviction follows insertion order only: reading an entry does not make it
/// younger, so a flood of distinct unanswerable queries cannot pin entries.
/// A capacity of zero disables caching.
#[derive(Debug)]
pub struct RecentCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> RecentCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Store `value` under `key`. Replacing an existing key keeps its
    /// position in the eviction order.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                trace!(capacity = self.capacity, "cache entry evicted");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut cache = RecentCache::new(3);
        for i in 0..1000 {
            cache.insert(format!("miss-{i}"), i);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&"miss-999".to_string()), Some(&999));
        assert_eq!(cache.get(&"miss-996".to_string()), None);
    }

    #[test]
    fn test_reads_do_not_refresh_entries() {
        let mut cache = RecentCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);
        // "a" was read but is still the oldest insertion.
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_replacing_keeps_position() {
        let mut cache = RecentCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut cache = RecentCache::new(0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = RecentCache::new(4);
        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.clear();
        assert!(cache.is_empty());
        cache.insert(3, "three");
        assert_eq!(cache.len(), 1);
    }
}
