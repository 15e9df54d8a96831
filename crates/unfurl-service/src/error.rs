use thiserror::Error;
use unfurl_core::{CoreError, Platform, StorageError};
use unfurl_resolver::ResolveError;

/// The error taxonomy exposed to callers of the resolution service.
///
/// Upstream exhaustion is deliberately distinct from storage failure so
/// operators can tell "all scrapers down" apart from "our persistence is
/// broken", and neither is ever conflated with a plain not-found.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid source url: {0}")]
    InvalidUrl(String),
    #[error("unsupported source url: {0}")]
    UnsupportedUrl(String),
    #[error("all upstream resolvers for {platform} are unavailable")]
    UpstreamExhausted { platform: Platform },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("short id not found")]
    NotFound,
    #[error("media is unavailable and no previous resolution is stored")]
    MediaUnavailable,
    #[error("short id space saturated after {0} allocation attempts")]
    IdSpaceSaturated(u32),
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::UnsupportedUrl(url) => ServiceError::UnsupportedUrl(url),
            CoreError::InvalidShortId(msg) => ServiceError::InvalidUrl(msg),
        }
    }
}

impl From<ResolveError> for ServiceError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::Exhausted { platform, .. } => {
                ServiceError::UpstreamExhausted { platform }
            }
        }
    }
}
