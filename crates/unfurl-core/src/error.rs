use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short id: {0}")]
    InvalidShortId(String),
    #[error("unsupported source url: {0}")]
    UnsupportedUrl(String),
}

/// Errors surfaced by [`LinkStore`](crate::store::LinkStore) implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short id already exists: {0}")]
    Conflict(String),
    #[error("no record for short id: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
