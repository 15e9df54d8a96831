use async_trait::async_trait;
use thiserror::Error;
use unfurl_core::{Platform, ProviderPayload};

/// Failure modes of a single provider call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider call timed out")]
    Timeout,
    #[error("provider is rate limited")]
    RateLimited,
    #[error("provider returned an error envelope: {0}")]
    Upstream(String),
    #[error("http request failed: {0}")]
    Http(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Rate-limit signals skip the remaining retry budget for the
    /// provider that raised them.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(err.to_string())
        }
    }
}

/// An upstream media-resolution provider.
///
/// Implementations own their transport and response schema; the only
/// contract is source URL in, platform-tagged payload out. Each provider
/// serves exactly one platform.
#[async_trait]
pub trait ResolverProvider: Send + Sync + 'static {
    /// A short name for logs (e.g. the endpoint host).
    fn name(&self) -> &str;

    /// The platform this provider resolves.
    fn platform(&self) -> Platform;

    /// Resolves a source URL into a platform-shaped payload.
    async fn resolve(&self, source_url: &str) -> Result<ProviderPayload, ProviderError>;
}
