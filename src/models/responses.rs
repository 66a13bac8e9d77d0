//! Response DTOs for the guard server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::time::Duration;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::query::RangeSum;

/// Rounds a duration up to whole milliseconds, saturating at `u64::MAX`.
///
/// Rounding up keeps a client that waits exactly `retry_after_ms` from
/// arriving before the window has moved.
pub fn millis_ceil(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

/// Response body for GET /sum/:left/:right
#[derive(Debug, Clone, Serialize)]
pub struct SumResponse {
    pub left: usize,
    pub right: usize,
    pub sum: i64,
    /// True if answered from the range cache
    pub cached: bool,
}

impl From<RangeSum> for SumResponse {
    fn from(range: RangeSum) -> Self {
        Self {
            left: range.left,
            right: range.right,
            sum: range.sum,
            cached: range.cached,
        }
    }
}

/// Response body for PUT /update
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse {
    pub index: usize,
    pub value: i64,
    /// Cached ranges dropped by this write
    pub invalidated: usize,
}

impl UpdateResponse {
    pub fn new(index: usize, value: i64, invalidated: usize) -> Self {
        Self {
            index,
            value,
            invalidated,
        }
    }
}

/// Response body for an accepted POST /admit
#[derive(Debug, Clone, Serialize)]
pub struct AdmitResponse {
    pub entity: String,
    pub admitted: bool,
    /// Admissions left in the current window
    pub remaining: usize,
}

impl AdmitResponse {
    pub fn admitted(entity: impl Into<String>, remaining: usize) -> Self {
        Self {
            entity: entity.into(),
            admitted: true,
            remaining,
        }
    }
}

/// Response body for GET /admit/:entity
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionStatusResponse {
    pub entity: String,
    pub can_admit: bool,
    pub remaining: usize,
    /// Milliseconds until the next admission can succeed
    pub retry_after_ms: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Number of ranges dropped by updates
    pub invalidations: u64,
    /// Current number of cached ranges
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entities with a live admission history
    pub active_entities: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and limiter state
    pub fn new(stats: &CacheStats, active_entities: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            active_entities,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
