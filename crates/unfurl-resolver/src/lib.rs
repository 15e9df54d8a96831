//! Upstream media resolution.
//!
//! This crate turns a source URL into a normalized
//! [`ProviderPayload`](unfurl_core::ProviderPayload) by calling one or
//! more third-party resolver providers. The [`ResolverPool`] owns the
//! per-platform provider registry and applies selection, per-call
//! timeouts, bounded retry with backoff, and ordered fallback; callers
//! only ever see a payload or a single aggregated exhaustion error.

pub mod error;
pub mod pool;
pub mod provider;
pub mod providers;
pub mod twitter;

pub use error::ResolveError;
pub use pool::{PoolSettings, ResolverPool, SelectionPolicy};
pub use provider::{ProviderError, ResolverProvider};
pub use providers::instagram::InstagramProvider;
pub use providers::tiktok::TikTokProvider;
pub use twitter::TwitterResolver;
