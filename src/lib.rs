//! Mini Guard - Bounding the cost of repeated and high-frequency requests
//!
//! Two independent primitives: a capacity-bounded LRU cache of range sums with
//! index-scoped invalidation, and a per-entity sliding-window admission
//! limiter. A small HTTP server exposes both.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod query;
pub mod tasks;

pub use api::AppState;
pub use cache::{RangeKey, RangeSumCache};
pub use config::Config;
pub use error::{GuardError, Result};
pub use limiter::{Clock, ManualClock, MonotonicClock, SlidingWindowLimiter, WindowStatus};
pub use query::RangeQueryEngine;
pub use tasks::spawn_sweep_task;
