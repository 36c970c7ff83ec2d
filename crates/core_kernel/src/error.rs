//! Core error taxonomy shared across the system
//!
//! A missing document and a document owned by another tenant both surface as
//! `NotFound` so that callers cannot probe for existence across tenants.

use thiserror::Error;

/// Core error type shared by ports and domain services
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidState(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        CoreError::Unauthenticated(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        CoreError::Store(message.into())
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}
