//! Range Sum Cache Module
//!
//! Bounded map from range keys to cached sums, combined with an O(1) recency
//! list for LRU eviction and index-scoped invalidation.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::cache::{CacheStats, NodeHandle, RangeKey, RecencyList};
use crate::error::{GuardError, Result};

#[derive(Debug)]
struct Slot {
    value: i64,
    handle: NodeHandle,
}

// == Range Sum Cache ==
/// Capacity-bounded LRU cache of range aggregates.
///
/// Every resident key is present in both the value map and the recency list,
/// and both hold at most `capacity` keys. Methods take `&mut self` because a
/// lookup promotes the key; share an instance behind a single lock.
#[derive(Debug)]
pub struct RangeSumCache {
    /// Range -> cached value and recency position
    entries: HashMap<RangeKey, Slot>,
    /// LRU (front) to MRU (back)
    recency: RecencyList<RangeKey>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of resident ranges
    capacity: usize,
}

impl RangeSumCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` ranges.
    ///
    /// # Errors
    /// `GuardError::InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(GuardError::InvalidConfig(
                "cache capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            recency: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Returns the cached value for `key` and promotes it to most recently used.
    ///
    /// `None` is a miss and leaves the cache untouched apart from statistics.
    pub fn get(&mut self, key: &RangeKey) -> Option<i64> {
        match self.entries.get(key) {
            Some(slot) => {
                self.recency.move_to_back(slot.handle);
                self.stats.record_hit();
                Some(slot.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `value` for `key` as most recently used.
    ///
    /// An existing key is overwritten in place. A new key evicts the least
    /// recently used entry first when the cache is full.
    pub fn put(&mut self, key: RangeKey, value: i64) {
        if let Some(slot) = self.entries.get_mut(&key) {
            slot.value = value;
            self.recency.move_to_back(slot.handle);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.recency.pop_front() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                trace!(range = %evicted, "evicted least recently used range");
            }
        }

        let handle = self.recency.push_back(key);
        self.entries.insert(key, Slot { value, handle });
        self.stats.set_total_entries(self.entries.len());
    }

    // == Invalidate Index ==
    /// Removes every resident range covering `index`.
    ///
    /// Scans the resident set once. Returns the number of removed entries.
    pub fn invalidate_index(&mut self, index: usize) -> usize {
        let stale: Vec<(RangeKey, NodeHandle)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.covers(index))
            .map(|(key, slot)| (*key, slot.handle))
            .collect();

        for (key, handle) in &stale {
            self.entries.remove(key);
            self.recency.remove(*handle);
        }

        let count = stale.len();
        if count > 0 {
            self.stats.record_invalidations(count);
            self.stats.set_total_entries(self.entries.len());
            debug!(index, count, "invalidated cached ranges");
        }
        count
    }

    // == Contains ==
    /// Checks residency without promoting the key or touching statistics.
    pub fn contains(&self, key: &RangeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    // == Keys ==
    /// Resident keys from least to most recently used.
    pub fn keys(&self) -> Vec<RangeKey> {
        self.recency.iter().copied().collect()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Panics if the value map and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.recency.len());
        assert!(self.entries.len() <= self.capacity);
        for key in self.recency.iter() {
            let slot = self
                .entries
                .get(key)
                .unwrap_or_else(|| panic!("{key} linked but not mapped"));
            assert_eq!(self.recency.get(slot.handle), Some(key));
        }
    }
}
