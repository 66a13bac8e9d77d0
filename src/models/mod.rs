//! Request and Response models for the guard server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_entity, AdmitRequest, UpdateRequest, MAX_ENTITY_LENGTH};
pub use responses::{
    millis_ceil, AdmissionStatusResponse, AdmitResponse, HealthResponse, StatsResponse,
    SumResponse, UpdateResponse,
};
