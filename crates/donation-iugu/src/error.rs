//! Gateway Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, IuguError>;

/// Iugu gateway errors
///
/// Covers credentials and transport-level faults only: an invoice the
/// API refused with an errors payload is not an error here, it is an
/// [`InvoiceOutcome::Rejected`](crate::InvoiceOutcome).
#[derive(Error, Debug)]
pub enum IuguError {
    /// No API token configured for the selected mode
    #[error("API token not configured for {0} mode")]
    MissingToken(&'static str),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status without a recognizable errors payload
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl IuguError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::MissingToken(_) | Self::Decode(_) => false,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingToken(_) => {
                "The payment gateway is not configured. Please inform the owner of the website."
            }
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_) => {
                "The payment gateway is currently unavailable. Please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_faults_are_retryable() {
        assert!(IuguError::Transport("timeout".into()).is_retryable());
        assert!(
            IuguError::Status {
                status: 502,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !IuguError::Status {
                status: 404,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!IuguError::MissingToken("live").is_retryable());
    }
}
