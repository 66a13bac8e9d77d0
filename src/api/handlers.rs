//! API Handlers
//!
//! HTTP request handlers for each guard server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::limiter::{Clock, MonotonicClock, SlidingWindowLimiter};
use crate::models::{
    millis_ceil, validate_entity, AdmissionStatusResponse, AdmitRequest, AdmitResponse,
    HealthResponse, StatsResponse, SumResponse, UpdateRequest, UpdateResponse,
};
use crate::query::RangeQueryEngine;

/// Application state shared across all handlers.
///
/// The query engine sits behind one lock because every range lookup promotes
/// a cache entry. The limiter synchronizes per entity on its own.
#[derive(Clone)]
pub struct AppState {
    /// Array and range cache
    pub engine: Arc<RwLock<RangeQueryEngine>>,
    /// Per-entity admission control
    pub limiter: Arc<SlidingWindowLimiter>,
    /// Time source for admissions
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        engine: RangeQueryEngine,
        limiter: SlidingWindowLimiter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            limiter: Arc::new(limiter),
            clock,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The array starts zeroed and admissions are timed by a monotonic clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = RangeQueryEngine::zeroed(config.array_len, config.cache_capacity)?;
        let limiter = SlidingWindowLimiter::new(config.window(), config.max_events)?;
        Ok(Self::new(engine, limiter, Arc::new(MonotonicClock::new())))
    }
}

/// Handler for GET /sum/:left/:right
///
/// Returns the inclusive range sum, served from the cache when resident.
pub async fn sum_handler(
    State(state): State<AppState>,
    Path((left, right)): Path<(usize, usize)>,
) -> Result<Json<SumResponse>> {
    // Write lock: a cache hit promotes the range
    let mut engine = state.engine.write().await;
    let range = engine.range_sum(left, right)?;

    Ok(Json(range.into()))
}

/// Handler for PUT /update
///
/// Writes one array element and invalidates the ranges covering it.
pub async fn update_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    let mut engine = state.engine.write().await;
    let invalidated = engine.update(req.index, req.value)?;

    Ok(Json(UpdateResponse::new(req.index, req.value, invalidated)))
}

/// Handler for POST /admit
///
/// Records an event for the entity, or answers 429 with the wait time.
pub async fn admit_handler(
    State(state): State<AppState>,
    Json(req): Json<AdmitRequest>,
) -> Result<Json<AdmitResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GuardError::InvalidRequest(error_msg));
    }

    let now = state.clock.now();
    let (admitted, status) = state
        .limiter
        .try_admit_with_status(req.entity.as_str(), now);
    if admitted {
        return Ok(Json(AdmitResponse::admitted(req.entity, status.remaining)));
    }

    debug!(entity = %req.entity, wait = ?status.retry_after, "admission denied");
    Err(GuardError::RateLimited {
        entity: req.entity,
        retry_after_ms: millis_ceil(status.retry_after),
    })
}

/// Handler for GET /admit/:entity
///
/// Reports whether the entity could be admitted now, without recording anything.
pub async fn admission_status_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<AdmissionStatusResponse>> {
    if let Some(error_msg) = validate_entity(&entity) {
        return Err(GuardError::InvalidRequest(error_msg));
    }

    let status = state.limiter.status(entity.as_str(), state.clock.now());
    let response = AdmissionStatusResponse {
        can_admit: status.can_admit(),
        remaining: status.remaining,
        retry_after_ms: millis_ceil(status.retry_after),
        entity,
    };

    Ok(Json(response))
}

/// Handler for GET /stats
///
/// Returns cache statistics and the number of active limiter entities.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.engine.read().await.stats();

    Json(StatsResponse::new(&stats, state.limiter.active_entities()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::ManualClock;
    use std::time::Duration;

    fn test_state(clock: ManualClock) -> AppState {
        let engine = RangeQueryEngine::new((1..=10).collect(), 8).unwrap();
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(5), 1).unwrap();
        AppState::new(engine, limiter, Arc::new(clock))
    }

    #[tokio::test]
    async fn test_sum_handler_miss_then_hit() {
        let state = test_state(ManualClock::default());

        let first = sum_handler(State(state.clone()), Path((0, 3))).await.unwrap();
        assert_eq!(first.sum, 10);
        assert!(!first.cached);

        let second = sum_handler(State(state), Path((0, 3))).await.unwrap();
        assert!(second.cached);
    }

    #[tokio::test]
    async fn test_update_handler_invalidates() {
        let state = test_state(ManualClock::default());
        sum_handler(State(state.clone()), Path((0, 3))).await.unwrap();

        let req = UpdateRequest {
            index: 2,
            value: 30,
        };
        let resp = update_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(resp.invalidated, 1);

        let after = sum_handler(State(state), Path((0, 3))).await.unwrap();
        assert_eq!(after.sum, 1 + 2 + 30 + 4);
        assert!(!after.cached);
    }

    #[tokio::test]
    async fn test_sum_handler_out_of_bounds() {
        let state = test_state(ManualClock::default());

        let result = sum_handler(State(state), Path((0, 10))).await;
        assert!(matches!(result, Err(GuardError::OutOfBounds { .. })));
    }

    #[tokio::test]
    async fn test_admit_handler_denies_second_event() {
        let clock = ManualClock::default();
        let state = test_state(clock.clone());
        let req = || AdmitRequest {
            entity: "alice".to_string(),
        };

        let resp = admit_handler(State(state.clone()), Json(req())).await.unwrap();
        assert!(resp.admitted);
        assert_eq!(resp.remaining, 0);

        clock.advance(Duration::from_secs(3));
        let result = admit_handler(State(state.clone()), Json(req())).await;
        assert!(matches!(
            result,
            Err(GuardError::RateLimited {
                retry_after_ms: 2000,
                ..
            })
        ));

        clock.advance(Duration::from_secs(2));
        assert!(admit_handler(State(state), Json(req())).await.is_ok());
    }

    #[tokio::test]
    async fn test_admit_handler_invalid_entity() {
        let state = test_state(ManualClock::default());
        let req = AdmitRequest {
            entity: "".to_string(),
        };

        let result = admit_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(GuardError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_admission_status_does_not_record() {
        let state = test_state(ManualClock::default());

        let status = admission_status_handler(State(state.clone()), Path("bob".to_string()))
            .await
            .unwrap();
        assert!(status.can_admit);
        assert_eq!(status.remaining, 1);
        assert_eq!(status.retry_after_ms, 0);
        assert_eq!(state.limiter.active_entities(), 0);
    }

    #[tokio::test]
    async fn test_admission_status_when_full() {
        let clock = ManualClock::default();
        let state = test_state(clock.clone());
        let req = AdmitRequest {
            entity: "carol".to_string(),
        };
        admit_handler(State(state.clone()), Json(req)).await.unwrap();

        clock.advance(Duration::from_millis(1500));
        let status = admission_status_handler(State(state.clone()), Path("carol".to_string()))
            .await
            .unwrap();
        assert!(!status.can_admit);
        assert_eq!(status.remaining, 0);
        assert_eq!(status.retry_after_ms, 3500);

        clock.advance(Duration::from_millis(3500));
        let status = admission_status_handler(State(state), Path("carol".to_string()))
            .await
            .unwrap();
        assert!(status.can_admit);
        assert_eq!(status.remaining, 1);
        assert_eq!(status.retry_after_ms, 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state(ManualClock::default());
        sum_handler(State(state.clone()), Path((1, 2))).await.unwrap();
        sum_handler(State(state.clone()), Path((1, 2))).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.active_entities, 0);
    }

    #[test]
    fn test_from_config_rejects_zero_capacity() {
        let config = Config {
            cache_capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            AppState::from_config(&config),
            Err(GuardError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
