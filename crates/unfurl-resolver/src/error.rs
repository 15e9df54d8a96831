use thiserror::Error;
use unfurl_core::Platform;

/// The single failure shape the pool exposes to callers.
///
/// Provider-specific errors are consumed inside the pool as fallback
/// triggers and never leak past it.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("all resolver providers for {platform} exhausted after {attempts} attempts")]
    Exhausted { platform: Platform, attempts: u32 },
}
