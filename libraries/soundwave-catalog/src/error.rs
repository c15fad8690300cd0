//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when searching the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog could not be reached (connection, timeout, transport)
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success status
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Failed to parse the catalog response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid catalog URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The request was superseded or explicitly cancelled
    #[error("Search cancelled")]
    Cancelled,
}

impl CatalogError {
    /// Whether retrying the same request may succeed
    ///
    /// Only transport failures qualify; a provider rejection or a cancelled
    /// request is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Provider {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
