//! Error Types

use thiserror::Error;

use crate::payment::PaymentId;

/// Result type alias for host-platform operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Host-platform errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Payment store could not persist or update a record
    #[error("Storage error: {0}")]
    Storage(String),

    /// Status update addressed a record that does not exist
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Storage(_) | Self::PaymentNotFound(_) => {
                "Your donation could not be recorded. Please try again."
            }
            Self::Json(_) => "An error occurred processing your request.",
        }
    }
}
