//! Cache Module
//!
//! Capacity-bounded LRU cache of range aggregates with index-scoped invalidation.

mod key;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use key::RangeKey;
pub use recency::{NodeHandle, RecencyList};
pub use stats::CacheStats;
pub use store::RangeSumCache;
