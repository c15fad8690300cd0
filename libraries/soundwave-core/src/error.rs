/// Core error types for Soundwave
use thiserror::Error;

/// Result type alias using `SoundwaveError`
pub type Result<T> = std::result::Result<T, SoundwaveError>;

/// Core error type for Soundwave
#[derive(Error, Debug)]
pub enum SoundwaveError {
    /// Snapshot storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SoundwaveError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
