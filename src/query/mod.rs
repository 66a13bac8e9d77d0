//! Query Module
//!
//! Read/write query layer over an owned array, accelerated by the range cache.

mod engine;

pub use engine::{RangeQueryEngine, RangeSum};
