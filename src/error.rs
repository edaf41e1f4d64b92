//! Error types for bitacora

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// True for the "record must exist" failure raised by `update`
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
