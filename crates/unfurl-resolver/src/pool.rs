use crate::error::ResolveError;
use crate::provider::ResolverProvider;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;
use unfurl_core::{Platform, ProviderPayload};

/// How the pool orders providers within a single resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Registry order; first registered is tried first.
    #[default]
    Priority,
    /// Random order without replacement, spreading load across
    /// providers while still trying every one before giving up.
    Shuffled,
}

/// Tunables for provider selection, retry, and timeouts.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolSettings {
    /// Upper bound on a single provider call, including connect time.
    #[builder(default = Duration::from_secs(15))]
    pub provider_timeout: Duration,
    /// Attempts per provider before it is marked exhausted.
    #[builder(default = 2)]
    pub attempts_per_provider: u32,
    /// Pause between attempts against the same provider.
    #[builder(default = Duration::from_millis(500))]
    pub retry_backoff: Duration,
    #[builder(default)]
    pub selection: SelectionPolicy,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// An injected registry of resolver providers, keyed by platform.
///
/// One resolution call tries providers in policy order, each with a
/// bounded number of timed attempts, and reports a single aggregated
/// exhaustion error when every provider has failed.
pub struct ResolverPool {
    registry: HashMap<Platform, Vec<Arc<dyn ResolverProvider>>>,
    settings: PoolSettings,
}

impl ResolverPool {
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            registry: HashMap::new(),
            settings,
        }
    }

    /// Registers a provider for its platform, after any already
    /// registered for that platform.
    pub fn register(&mut self, provider: Arc<dyn ResolverProvider>) -> &mut Self {
        self.registry
            .entry(provider.platform())
            .or_default()
            .push(provider);
        self
    }

    /// Number of providers registered for a platform.
    pub fn provider_count(&self, platform: Platform) -> usize {
        self.registry.get(&platform).map_or(0, Vec::len)
    }

    /// Resolves a source URL through the platform's providers.
    ///
    /// A timed-out call counts as a provider failure; a rate-limit
    /// signal forfeits the provider's remaining retry budget
    /// immediately. Provider error shapes never escape this method.
    pub async fn resolve(
        &self,
        platform: Platform,
        source_url: &str,
    ) -> Result<ProviderPayload, ResolveError> {
        let order = self.ordered_providers(platform);
        let mut attempts = 0u32;

        for provider in &order {
            for attempt in 1..=self.settings.attempts_per_provider {
                if attempt > 1 {
                    tokio::time::sleep(self.settings.retry_backoff).await;
                }
                attempts += 1;

                let outcome = tokio::time::timeout(
                    self.settings.provider_timeout,
                    provider.resolve(source_url),
                )
                .await;

                match outcome {
                    Ok(Ok(payload)) => {
                        debug!(
                            provider = provider.name(),
                            %platform,
                            attempt,
                            "provider resolved media"
                        );
                        return Ok(payload);
                    }
                    Ok(Err(e)) => {
                        warn!(
                            provider = provider.name(),
                            %platform,
                            attempt,
                            error = %e,
                            "provider attempt failed"
                        );
                        if e.is_rate_limited() {
                            // Over quota; retrying this provider now is pointless.
                            break;
                        }
                    }
                    Err(_) => {
                        warn!(
                            provider = provider.name(),
                            %platform,
                            attempt,
                            timeout = ?self.settings.provider_timeout,
                            "provider attempt timed out"
                        );
                    }
                }
            }
        }

        Err(ResolveError::Exhausted { platform, attempts })
    }

    fn ordered_providers(&self, platform: Platform) -> Vec<Arc<dyn ResolverProvider>> {
        let mut providers = self
            .registry
            .get(&platform)
            .cloned()
            .unwrap_or_default();
        if self.settings.selection == SelectionPolicy::Shuffled {
            providers.shuffle(&mut rand::thread_rng());
        }
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A scripted provider: fails `failures` times, then succeeds (or
    /// always fails when `succeed` is false).
    struct StubProvider {
        name: String,
        platform: Platform,
        calls: AtomicU32,
        failures: u32,
        succeed: bool,
        error: ProviderError,
    }

    impl StubProvider {
        fn failing(name: &str, error: ProviderError) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                platform: Platform::TikTok,
                calls: AtomicU32::new(0),
                failures: u32::MAX,
                succeed: false,
                error,
            })
        }

        fn succeeding(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                platform: Platform::TikTok,
                calls: AtomicU32::new(0),
                failures: 0,
                succeed: true,
                error: ProviderError::Timeout,
            })
        }

        fn flaky(name: &str, failures: u32) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                platform: Platform::TikTok,
                calls: AtomicU32::new(0),
                failures,
                succeed: true,
                error: ProviderError::Http("connection reset".into()),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn payload(&self) -> ProviderPayload {
            ProviderPayload::TikTok {
                play: format!("https://cdn.example/{}.mp4", self.name),
                hdplay: None,
                music: None,
                cover: None,
                title: None,
                author: None,
                play_count: None,
                digg_count: None,
                comment_count: None,
                share_count: None,
            }
        }
    }

    #[async_trait]
    impl ResolverProvider for StubProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn platform(&self) -> Platform {
            self.platform
        }

        async fn resolve(&self, _source_url: &str) -> Result<ProviderPayload, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed && call >= self.failures {
                Ok(self.payload())
            } else {
                Err(self.error.clone())
            }
        }
    }

    fn fast_settings() -> PoolSettings {
        PoolSettings::builder()
            .provider_timeout(Duration::from_millis(500))
            .retry_backoff(Duration::from_millis(1))
            .build()
    }

    fn media_url(payload: ProviderPayload) -> String {
        payload.normalize().media_url
    }

    #[tokio::test]
    async fn falls_back_to_last_provider() {
        let bad1 = StubProvider::failing("p1", ProviderError::Http("down".into()));
        let bad2 = StubProvider::failing("p2", ProviderError::Upstream("nope".into()));
        let good = StubProvider::succeeding("p3");

        let mut pool = ResolverPool::new(fast_settings());
        pool.register(bad1.clone())
            .register(bad2.clone())
            .register(good.clone());

        let payload = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap();
        assert_eq!(media_url(payload), "https://cdn.example/p3.mp4");
        assert_eq!(bad1.calls(), 2);
        assert_eq!(bad2.calls(), 2);
        assert_eq!(good.calls(), 1);
    }

    #[tokio::test]
    async fn all_failing_is_exhausted() {
        let bad1 = StubProvider::failing("p1", ProviderError::Http("down".into()));
        let bad2 = StubProvider::failing("p2", ProviderError::Malformed("junk".into()));

        let mut pool = ResolverPool::new(fast_settings());
        pool.register(bad1).register(bad2);

        let err = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ResolveError::Exhausted { platform: Platform::TikTok, attempts: 4 })
        );
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let flaky = StubProvider::flaky("p1", 1);

        let mut pool = ResolverPool::new(fast_settings());
        pool.register(flaky.clone());

        let payload = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap();
        assert_eq!(media_url(payload), "https://cdn.example/p1.mp4");
        assert_eq!(flaky.calls(), 2);
    }

    #[tokio::test]
    async fn rate_limit_skips_remaining_retries() {
        let limited = StubProvider::failing("p1", ProviderError::RateLimited);
        let good = StubProvider::succeeding("p2");

        let mut pool = ResolverPool::new(fast_settings());
        pool.register(limited.clone()).register(good.clone());

        let payload = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap();
        assert_eq!(media_url(payload), "https://cdn.example/p2.mp4");
        // only one call burnt against the rate-limited provider
        assert_eq!(limited.calls(), 1);
    }

    #[tokio::test]
    async fn unregistered_platform_is_exhausted_immediately() {
        let pool = ResolverPool::new(fast_settings());
        let err = pool
            .resolve(Platform::Instagram, "https://instagram.com/reel/x/")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Exhausted { platform: Platform::Instagram, attempts: 0 }
        ));
    }

    #[tokio::test]
    async fn hung_provider_times_out_and_falls_back() {
        struct HangingProvider;

        #[async_trait]
        impl ResolverProvider for HangingProvider {
            fn name(&self) -> &str {
                "hanging"
            }
            fn platform(&self) -> Platform {
                Platform::TikTok
            }
            async fn resolve(
                &self,
                _source_url: &str,
            ) -> Result<ProviderPayload, ProviderError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                unreachable!("sleep outlives the pool timeout")
            }
        }

        let good = StubProvider::succeeding("p2");
        let mut pool = ResolverPool::new(
            PoolSettings::builder()
                .provider_timeout(Duration::from_millis(20))
                .attempts_per_provider(1)
                .retry_backoff(Duration::from_millis(1))
                .build(),
        );
        pool.register(Arc::new(HangingProvider)).register(good.clone());

        let payload = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap();
        assert_eq!(media_url(payload), "https://cdn.example/p2.mp4");
    }

    #[tokio::test]
    async fn shuffled_policy_still_tries_every_provider() {
        let bad1 = StubProvider::failing("p1", ProviderError::Http("down".into()));
        let bad2 = StubProvider::failing("p2", ProviderError::Http("down".into()));
        let good = StubProvider::succeeding("p3");

        let mut pool = ResolverPool::new(
            PoolSettings::builder()
                .provider_timeout(Duration::from_millis(500))
                .retry_backoff(Duration::from_millis(1))
                .selection(SelectionPolicy::Shuffled)
                .build(),
        );
        pool.register(bad1).register(bad2).register(good);

        let payload = pool
            .resolve(Platform::TikTok, "https://tiktok.com/@u/video/1")
            .await
            .unwrap();
        assert_eq!(media_url(payload), "https://cdn.example/p3.mp4");
    }
}
