//! Range Query Engine
//!
//! Owns the mutable array and its `RangeSumCache`, keeping the two consistent:
//! every write invalidates the covering ranges before it returns.

use serde::Serialize;
use tracing::trace;

use crate::cache::{CacheStats, RangeKey, RangeSumCache};
use crate::error::{GuardError, Result};

// == Range Sum ==
/// Result of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeSum {
    pub left: usize,
    pub right: usize,
    pub sum: i64,
    /// True if served from the cache
    pub cached: bool,
}

// == Range Query Engine ==
/// Array of integers answering inclusive range sums through a `RangeSumCache`.
#[derive(Debug)]
pub struct RangeQueryEngine {
    values: Vec<i64>,
    cache: RangeSumCache,
}

impl RangeQueryEngine {
    // == Constructor ==
    /// Wraps `values` with a cache of `capacity` ranges.
    ///
    /// # Errors
    /// `GuardError::InvalidConfig` if `values` is empty or `capacity` is zero.
    pub fn new(values: Vec<i64>, capacity: usize) -> Result<Self> {
        if values.is_empty() {
            return Err(GuardError::InvalidConfig(
                "array length must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            values,
            cache: RangeSumCache::new(capacity)?,
        })
    }

    /// Creates an engine over `len` zeros.
    pub fn zeroed(len: usize, capacity: usize) -> Result<Self> {
        Self::new(vec![0; len], capacity)
    }

    // == Range Sum ==
    /// Sums `values[left..=right]`, answering from the cache when possible.
    ///
    /// On a miss the sum is computed and stored under `(left, right)`.
    pub fn range_sum(&mut self, left: usize, right: usize) -> Result<RangeSum> {
        let key = self.checked_key(left, right)?;

        if let Some(sum) = self.cache.get(&key) {
            return Ok(RangeSum {
                left,
                right,
                sum,
                cached: true,
            });
        }

        let sum = self.sum_slice(key)?;
        self.cache.put(key, sum);
        trace!(range = %key, sum, "cached range sum");

        Ok(RangeSum {
            left,
            right,
            sum,
            cached: false,
        })
    }

    // == Range Sum Uncached ==
    /// Sums `values[left..=right]` directly without reading or filling the cache.
    pub fn range_sum_uncached(&self, left: usize, right: usize) -> Result<i64> {
        let key = self.checked_key(left, right)?;
        self.sum_slice(key)
    }

    // == Update ==
    /// Writes `value` at `index` and drops every cached range covering it.
    ///
    /// Returns the number of invalidated ranges.
    pub fn update(&mut self, index: usize, value: i64) -> Result<usize> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(GuardError::OutOfBounds { index, len })?;
        *slot = value;

        Ok(self.cache.invalidate_index(index))
    }

    /// Returns the value at `index`.
    pub fn value(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &RangeSumCache {
        &self.cache
    }

    fn checked_key(&self, left: usize, right: usize) -> Result<RangeKey> {
        let key = RangeKey::new(left, right);
        if !key.is_well_formed() {
            return Err(GuardError::InvalidRequest(format!(
                "left {} is greater than right {}",
                left, right
            )));
        }
        if right >= self.values.len() {
            return Err(GuardError::OutOfBounds {
                index: right,
                len: self.values.len(),
            });
        }
        Ok(key)
    }

    /// Accumulates in i128, which cannot overflow for any slice of i64 values,
    /// so only a total outside the i64 range is rejected.
    fn sum_slice(&self, key: RangeKey) -> Result<i64> {
        let wide: i128 = self.values[key.left..=key.right]
            .iter()
            .map(|v| i128::from(*v))
            .sum();
        i64::try_from(wide).map_err(|_| GuardError::Overflow {
            left: key.left,
            right: key.right,
        })
    }
}
