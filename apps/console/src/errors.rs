use thiserror::Error;

use crate::storage::StorageError;

/// Message shown whenever a view needs a session and none is stored.
pub const SIGN_IN_AGAIN: &str = "Authentication error. Please sign in again.";

/// Application-level error type.
/// Every failure path resolves into a message the console can display; nothing here is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session is stored, so the request was never sent.
    #[error("Authentication required")]
    Unauthenticated,

    /// Client-side required-field checks failed before anything was submitted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote API answered with a non-2xx status.
    #[error("Request failed (status {status}): {message}")]
    Fetch { status: u16, message: String },

    /// No usable response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Maps the error to a message fit for a form error or a modal dialog.
    /// Unexpected variants are logged and reported generically.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => SIGN_IN_AGAIN.to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Fetch { message, .. } => message.clone(),
            AppError::Network(e) => {
                tracing::error!("Network error: {e}");
                "Unable to reach the server. Try again later.".to_string()
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                "Local storage could not be updated.".to_string()
            }
        }
    }
}
