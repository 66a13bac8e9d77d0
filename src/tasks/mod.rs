//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Idle sweep: drops limiter histories that have fully expired

mod sweep;

pub use sweep::spawn_sweep_task;
