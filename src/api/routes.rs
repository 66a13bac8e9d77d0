//! API Routes
//!
//! Configures the Axum router with all guard server endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    admission_status_handler, admit_handler, health_handler, stats_handler, sum_handler,
    update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /sum/:left/:right` - Inclusive range sum
/// - `PUT /update` - Overwrite one array element
/// - `POST /admit` - Record an event for an entity
/// - `GET /admit/:entity` - Admission status without recording
/// - `GET /stats` - Cache and limiter statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sum/:left/:right", get(sum_handler))
        .route("/update", put(update_handler))
        .route("/admit", post(admit_handler))
        .route("/admit/:entity", get(admission_status_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::{ManualClock, SlidingWindowLimiter};
    use crate::query::RangeQueryEngine;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let engine = RangeQueryEngine::zeroed(16, 4).unwrap();
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(10), 1).unwrap();
        create_router(AppState::new(engine, limiter, Arc::new(ManualClock::default())))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sum_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/sum/0/15")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sum_endpoint_reversed_range() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/sum/5/2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admit_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admit")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"entity":"alice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_out_of_bounds() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/update")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"index":16,"value":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
