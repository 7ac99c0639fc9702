//! Custom error types for the notifier

use thiserror::Error;

/// Custom error type for notification delivery
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The request did not complete (connect failure, timeout, broken body)
    #[error("Notification transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("Notification endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Configuration error
    #[error("Notifier configuration error: {0}")]
    Configuration(String),
}

/// Type alias for notifier results
pub type NotifyResult<T> = Result<T, NotifyError>;
