use crate::provider::{ProviderError, ResolverProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace};
use unfurl_core::{Platform, ProviderPayload};

/// Deterministic Twitter/X resolver.
///
/// Twitter needs no third-party scraping round trip: the direct asset
/// URL is built from the status id using a fixed media-mirror template.
/// A HEAD probe decides between the video and image templates, trying
/// video first. When the probe itself cannot reach the mirror, the
/// video template is used so the outcome stays deterministic and
/// independent of any provider being up.
pub struct TwitterResolver {
    client: Client,
    mirror: String,
}

impl TwitterResolver {
    pub const DEFAULT_MIRROR: &'static str = "https://d.fxtwitter.com";

    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_mirror(Self::DEFAULT_MIRROR, timeout)
    }

    /// Creates a resolver against a custom mirror base URL. Tests point
    /// this at a mock server.
    pub fn with_mirror(
        mirror: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::from)?;
        Ok(Self {
            client,
            mirror: mirror.into().trim_end_matches('/').to_string(),
        })
    }

    /// The video template URL for a status id.
    pub fn video_url(&self, status_id: u64) -> String {
        format!("{}/i/status/{}.mp4", self.mirror, status_id)
    }

    /// The image template URL for a status id.
    pub fn image_url(&self, status_id: u64) -> String {
        format!("{}/i/status/{}.jpg", self.mirror, status_id)
    }

    /// HEAD-probes a template URL; `None` means the mirror was
    /// unreachable and nothing can be concluded.
    async fn probe(&self, url: &str) -> Option<bool> {
        match self.client.head(url).send().await {
            Ok(response) => Some(response.status().is_success()),
            Err(e) => {
                trace!(url, error = %e, "asset probe unreachable");
                None
            }
        }
    }
}

#[async_trait]
impl ResolverProvider for TwitterResolver {
    fn name(&self) -> &str {
        "twitter-template"
    }

    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn resolve(&self, source_url: &str) -> Result<ProviderPayload, ProviderError> {
        let status_id = Platform::twitter_status_id(source_url).ok_or_else(|| {
            ProviderError::Upstream(format!("no status id in url: {source_url}"))
        })?;

        let video = self.video_url(status_id);
        let asset_url = match self.probe(&video).await {
            Some(true) | None => video,
            Some(false) => {
                let image = self.image_url(status_id);
                match self.probe(&image).await {
                    Some(true) => image,
                    // video-first default when neither probe confirms
                    _ => video,
                }
            }
        };

        debug!(status_id, asset_url = %asset_url, "derived twitter asset url");
        Ok(ProviderPayload::Twitter { asset_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn asset_url(payload: ProviderPayload) -> String {
        match payload {
            ProviderPayload::Twitter { asset_url } => asset_url,
            other => panic!("wrong payload variant: {other:?}"),
        }
    }

    #[test]
    fn templates_derive_purely_from_status_id() {
        let resolver =
            TwitterResolver::with_mirror("https://m.example", Duration::from_secs(1)).unwrap();
        assert_eq!(resolver.video_url(42), "https://m.example/i/status/42.mp4");
        assert_eq!(resolver.image_url(42), "https://m.example/i/status/42.jpg");
    }

    #[tokio::test]
    async fn video_probe_hit_picks_video() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/i/status/42.mp4"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let resolver =
            TwitterResolver::with_mirror(server.uri(), Duration::from_secs(2)).unwrap();
        let payload = resolver
            .resolve("https://x.com/user/status/42")
            .await
            .unwrap();
        assert!(asset_url(payload).ends_with("/i/status/42.mp4"));
    }

    #[tokio::test]
    async fn video_probe_miss_falls_back_to_image() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/i/status/42.mp4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/i/status/42.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let resolver =
            TwitterResolver::with_mirror(server.uri(), Duration::from_secs(2)).unwrap();
        let payload = resolver
            .resolve("https://x.com/user/status/42")
            .await
            .unwrap();
        assert!(asset_url(payload).ends_with("/i/status/42.jpg"));
    }

    #[tokio::test]
    async fn unreachable_mirror_defaults_to_video() {
        // Port 1 refuses connections; the probe errors and the video
        // template is still produced.
        let resolver =
            TwitterResolver::with_mirror("http://127.0.0.1:1", Duration::from_millis(200))
                .unwrap();
        let payload = resolver
            .resolve("https://x.com/user/status/42")
            .await
            .unwrap();
        assert_eq!(asset_url(payload), "http://127.0.0.1:1/i/status/42.mp4");
    }

    #[tokio::test]
    async fn url_without_status_id_is_an_error() {
        let resolver =
            TwitterResolver::with_mirror("https://m.example", Duration::from_secs(1)).unwrap();
        let err = resolver.resolve("https://x.com/user").await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream(_)));
    }
}
