//! Limiter Module
//!
//! Per-entity sliding-window admission control and the clocks that feed it.

mod clock;
mod window;


pub use clock::{Clock, ManualClock, MonotonicClock};
pub use window::{SlidingWindowLimiter, WindowStatus};
