/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database could not be opened or created
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction could not be started
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table could not be opened
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Read or write failed inside the database
    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// Commit failed
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// A stored value is missing or malformed
    #[error("Corrupt snapshot field {field}: {message}")]
    Corrupt { field: &'static str, message: String },

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a corrupt-field error
    pub fn corrupt(field: &'static str, message: impl Into<String>) -> Self {
        Self::Corrupt {
            field,
            message: message.into(),
        }
    }
}

impl From<StorageError> for soundwave_core::SoundwaveError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(e) => soundwave_core::SoundwaveError::Serialization(e),
            StorageError::Io(e) => soundwave_core::SoundwaveError::Io(e),
            other => soundwave_core::SoundwaveError::storage(other.to_string()),
        }
    }
}
