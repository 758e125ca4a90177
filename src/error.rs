//! Speakpad Error Types
//!
//! Centralized error handling for the control surface.

use thiserror::Error;

/// Central error type for Speakpad
#[derive(Error, Debug)]
pub enum SpeakpadError {
    /// Speak was requested with blank text. Shown to the user as a notice.
    #[error("Please enter some text!")]
    EmptyText,

    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpeakpadError {
    /// True for failures that are recovered locally and only shown as a notice
    pub fn is_notice(&self) -> bool {
        matches!(self, SpeakpadError::EmptyText)
    }
}

/// Result type alias for Speakpad operations
pub type SpeakpadResult<T> = Result<T, SpeakpadError>;
