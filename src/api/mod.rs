//! API Module
//!
//! HTTP handlers and routing for the guard server REST API.
//!
//! # Endpoints
//! - `GET /sum/:left/:right` - Inclusive range sum over the served array
//! - `PUT /update` - Overwrite one element, invalidating cached ranges
//! - `POST /admit` - Admit an event for an entity
//! - `GET /admit/:entity` - Inspect an entity's admission status
//! - `GET /stats` - Cache and limiter statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
