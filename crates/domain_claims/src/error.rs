//! Claims domain errors

use thiserror::Error;

use core_kernel::CoreError;

/// Errors from claim lifecycle operations
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    NotFound(String),

    #[error("Invalid state: cannot {action} a claim in status {status}")]
    InvalidState { action: &'static str, status: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClaimError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ClaimError::NotFound(message.into())
    }

    pub fn invalid_state(action: &'static str, status: impl Into<String>) -> Self {
        ClaimError::InvalidState {
            action,
            status: status.into(),
        }
    }
}
