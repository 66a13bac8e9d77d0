//! Idle Entity Sweep Task
//!
//! Background task that periodically drops limiter histories whose events
//! have all left the window.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{GuardError, Result};
use crate::limiter::{Clock, SlidingWindowLimiter};

/// Spawns a background task that sweeps idle entities out of the limiter.
///
/// Histories are already pruned lazily on access; the sweep reclaims entities
/// that stop sending events altogether.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Errors
/// `GuardError::InvalidConfig` if `sweep_interval_secs` is zero.
///
/// # Example
/// ```ignore
/// let limiter = Arc::new(SlidingWindowLimiter::new(Duration::from_secs(10), 1)?);
/// let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
/// let sweep_handle = spawn_sweep_task(limiter.clone(), clock, 1)?;
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(
    limiter: Arc<SlidingWindowLimiter>,
    clock: Arc<dyn Clock>,
    sweep_interval_secs: u64,
) -> Result<JoinHandle<()>> {
    if sweep_interval_secs == 0 {
        return Err(GuardError::InvalidConfig(
            "sweep interval must be at least one second".to_string(),
        ));
    }
    let interval = Duration::from_secs(sweep_interval_secs);

    Ok(tokio::spawn(async move {
        info!(
            "Starting idle entity sweep with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let dropped = limiter.sweep(clock.now());

            if dropped > 0 {
                info!(
                    dropped,
                    active = limiter.active_entities(),
                    "Sweep: dropped idle entities"
                );
            } else {
                debug!("Sweep: no idle entities found");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::ManualClock;

    fn limiter() -> Arc<SlidingWindowLimiter> {
        Arc::new(SlidingWindowLimiter::new(Duration::from_secs(1), 1).unwrap())
    }

    #[tokio::test]
    async fn test_sweep_task_drops_idle_entities() {
        let limiter = limiter();
        let clock = ManualClock::default();

        assert!(limiter.try_admit("idle", clock.now()));
        clock.advance(Duration::from_secs(2));

        let handle = spawn_sweep_task(limiter.clone(), Arc::new(clock.clone()), 1).unwrap();

        // Wait for at least one sweep to run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(limiter.active_entities(), 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_active_entities() {
        let limiter = limiter();
        let clock = ManualClock::default();

        assert!(limiter.try_admit("active", clock.now()));
        clock.advance(Duration::from_millis(500));

        let handle = spawn_sweep_task(limiter.clone(), Arc::new(clock.clone()), 1).unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(limiter.active_entities(), 1);
        assert!(!limiter.can_admit("active", clock.now()));
        handle.abort();
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = spawn_sweep_task(limiter(), Arc::new(ManualClock::default()), 0);
        assert!(matches!(result, Err(GuardError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let handle = spawn_sweep_task(limiter(), Arc::new(ManualClock::default()), 1).unwrap();

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
