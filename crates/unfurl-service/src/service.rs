use crate::allocator::IdGenerator;
use crate::error::ServiceError;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;
use unfurl_core::{LinkRecord, LinkStore, MediaDescriptor, Platform, ShortId};
use unfurl_resolver::ResolverPool;

/// Tunables for the resolution service.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// How long a created record stays retrievable.
    #[builder(default = SignedDuration::from_hours(7 * 24))]
    pub retention: SignedDuration,
    /// Upper bound on the opportunistic refresh during a visit; on
    /// expiry the request proceeds on stale data.
    #[builder(default = Duration::from_secs(10))]
    pub refresh_timeout: Duration,
    /// Cap on generate-check-insert rounds before giving up. At a 62^7
    /// address space this is a defensive measure, not a realistic
    /// failure mode.
    #[builder(default = 16)]
    pub max_alloc_attempts: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Result of a successful create flow.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub short_id: ShortId,
    pub platform: Platform,
    pub descriptor: MediaDescriptor,
}

/// Result of a successful resolve flow, ready for negotiation.
#[derive(Debug, Clone)]
pub struct ResolvedLink {
    pub source_url: String,
    pub platform: Platform,
    pub descriptor: MediaDescriptor,
}

/// The behavioral seam the HTTP surface depends on.
#[async_trait]
pub trait LinkResolver: Send + Sync + 'static {
    /// Creates a short link for a submitted source URL.
    async fn create(&self, source_url: &str) -> Result<CreatedLink, ServiceError>;

    /// Loads and refreshes the record behind a short id.
    async fn resolve(&self, short_id: &ShortId) -> Result<ResolvedLink, ServiceError>;

    /// The persisted descriptor for a short id, without any refresh.
    async fn info(&self, short_id: &ShortId) -> Result<Option<MediaDescriptor>, ServiceError>;
}

/// Orchestrates URL validation, upstream resolution, id allocation, and
/// persistence.
#[derive(Clone)]
pub struct LinkResolutionService<S, G> {
    store: Arc<S>,
    pool: Arc<ResolverPool>,
    generator: Arc<G>,
    settings: ServiceSettings,
}

impl<S: LinkStore, G: IdGenerator> LinkResolutionService<S, G> {
    pub fn new(store: S, pool: ResolverPool, generator: G, settings: ServiceSettings) -> Self {
        Self {
            store: Arc::new(store),
            pool: Arc::new(pool),
            generator: Arc::new(generator),
            settings,
        }
    }

    async fn refreshed_descriptor(
        &self,
        short_id: &ShortId,
        record: &LinkRecord,
    ) -> Option<MediaDescriptor> {
        let refresh = tokio::time::timeout(
            self.settings.refresh_timeout,
            self.pool.resolve(record.platform, &record.source_url),
        )
        .await;

        match refresh {
            Ok(Ok(payload)) => {
                let fresh = payload.normalize();
                // Best effort: serving the fresh descriptor matters more
                // than persisting it.
                if let Err(e) = self.store.refresh(short_id, fresh.clone()).await {
                    warn!(short_id = %short_id, error = %e, "failed to persist refreshed descriptor");
                }
                Some(fresh)
            }
            Ok(Err(e)) => {
                warn!(short_id = %short_id, error = %e, "refresh failed, serving last-known descriptor");
                record.descriptor.clone()
            }
            Err(_) => {
                warn!(
                    short_id = %short_id,
                    timeout = ?self.settings.refresh_timeout,
                    "refresh timed out, serving last-known descriptor"
                );
                record.descriptor.clone()
            }
        }
    }

    /// Generate-check-insert with collision retry.
    ///
    /// The existence pre-check keeps the common path cheap; the insert
    /// itself still reports conflicts, which count as collisions too
    /// (a concurrent allocator may have taken the id in the window).
    async fn allocate_and_insert(&self, record: LinkRecord) -> Result<ShortId, ServiceError> {
        for _ in 0..self.settings.max_alloc_attempts {
            let candidate = self.generator.generate();

            if self
                .store
                .exists(&candidate)
                .await
                .map_err(storage_error)?
            {
                warn!(short_id = %candidate, "short id collision, retrying");
                continue;
            }

            match self.store.insert(&candidate, record.clone()).await {
                Ok(()) => return Ok(candidate),
                Err(unfurl_core::StorageError::Conflict(_)) => {
                    warn!(short_id = %candidate, "lost allocation race, retrying");
                    continue;
                }
                Err(e) => return Err(storage_error(e)),
            }
        }

        Err(ServiceError::IdSpaceSaturated(
            self.settings.max_alloc_attempts,
        ))
    }

    /// Validates that the URL has an http(s) scheme and a host.
    fn validate_url(url: &str) -> Result<(), ServiceError> {
        if url.trim().is_empty() {
            return Err(ServiceError::InvalidUrl("url cannot be empty".to_string()));
        }

        let parts: Vec<&str> = url.split("://").collect();
        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(ServiceError::InvalidUrl(format!(
                "url must have a valid scheme and host: {url}"
            )));
        }

        let scheme = parts[0].to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ServiceError::InvalidUrl(format!(
                "url scheme must be http or https: {scheme}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<S: LinkStore, G: IdGenerator> LinkResolver for LinkResolutionService<S, G> {
    /// Create flow: validate, detect platform, resolve upstream,
    /// allocate an id, persist, return the short id and descriptor.
    ///
    /// Success is only reported after the store write completed. Two
    /// concurrent creations for the same source URL may produce two
    /// distinct short ids; idempotence on the source URL is not a
    /// guarantee of this design.
    async fn create(&self, source_url: &str) -> Result<CreatedLink, ServiceError> {
        Self::validate_url(source_url)?;
        let platform = Platform::detect(source_url)?;

        let payload = self.pool.resolve(platform, source_url).await?;
        let descriptor = payload.normalize();

        let now = Timestamp::now();
        let record = LinkRecord {
            source_url: source_url.to_string(),
            platform,
            descriptor: Some(descriptor.clone()),
            created_at: now,
            expire_at: now + self.settings.retention,
        };

        let short_id = self.allocate_and_insert(record).await?;
        debug!(short_id = %short_id, %platform, "created short link");

        Ok(CreatedLink {
            short_id,
            platform,
            descriptor,
        })
    }

    /// Resolve flow: load the record, opportunistically refresh the
    /// descriptor from upstream, and fall back to the last persisted
    /// descriptor when the refresh fails.
    ///
    /// Provider media URLs are typically short-lived signed URLs, hence
    /// the refetch on every visit. Twitter records skip the refresh:
    /// their template-derived asset URLs do not expire.
    async fn resolve(&self, short_id: &ShortId) -> Result<ResolvedLink, ServiceError> {
        let record = self
            .store
            .get(short_id)
            .await
            .map_err(storage_error)?
            .ok_or(ServiceError::NotFound)?;

        let descriptor = match record.platform {
            Platform::Twitter => record.descriptor,
            _ => self.refreshed_descriptor(short_id, &record).await,
        };

        let descriptor = descriptor.ok_or(ServiceError::MediaUnavailable)?;

        Ok(ResolvedLink {
            source_url: record.source_url,
            platform: record.platform,
            descriptor,
        })
    }

    /// The persisted descriptor for a short id, without any refresh.
    async fn info(&self, short_id: &ShortId) -> Result<Option<MediaDescriptor>, ServiceError> {
        let record = self
            .store
            .get(short_id)
            .await
            .map_err(storage_error)?
            .ok_or(ServiceError::NotFound)?;
        Ok(record.descriptor)
    }
}

/// Converts a StorageError, keeping not-found distinct from backend
/// failure.
fn storage_error(e: unfurl_core::StorageError) -> ServiceError {
    ServiceError::from(e)
}
