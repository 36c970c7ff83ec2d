//! Remittance domain errors

use thiserror::Error;

use core_kernel::CoreError;

/// Errors from remittance operations
#[derive(Debug, Error)]
pub enum RemittanceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The (payer, check number) pair was already ingested for this tenant
    #[error("Duplicate batch: check {check_number} from payer {payer_id} already ingested")]
    DuplicateBatch {
        payer_id: String,
        check_number: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RemittanceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        RemittanceError::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        RemittanceError::InvalidState(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RemittanceError::Validation(message.into())
    }
}
