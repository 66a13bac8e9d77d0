//! Request DTOs for the guard server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum allowed entity identifier length in bytes
pub const MAX_ENTITY_LENGTH: usize = 256;

/// Request body for PUT /update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// Array position to overwrite
    pub index: usize,
    /// New value
    pub value: i64,
}

/// Request body for POST /admit
#[derive(Debug, Clone, Deserialize)]
pub struct AdmitRequest {
    /// Entity the event is charged to (user, client, key)
    pub entity: String,
}

impl AdmitRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_entity(&self.entity)
    }
}

/// Checks an entity identifier taken from a body or a path.
pub fn validate_entity(entity: &str) -> Option<String> {
    if entity.is_empty() {
        return Some("Entity cannot be empty".to_string());
    }
    if entity.len() > MAX_ENTITY_LENGTH {
        return Some(format!(
            "Entity exceeds maximum length of {} bytes",
            MAX_ENTITY_LENGTH
        ));
    }
    None
}
