use crate::provider::{ProviderError, ResolverProvider};
use crate::providers::tiktok::host_label;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;
use unfurl_core::{Platform, ProviderPayload};

/// An Instagram resolver provider.
///
/// Speaks JSON GET `?url=...` against the configured endpoint and
/// expects a `{ success, video_url, ... }` envelope.
pub struct InstagramProvider {
    client: Client,
    endpoint: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

impl InstagramProvider {
    /// Creates a provider against the given endpoint URL. Tests point
    /// this at a mock server.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let name = host_label(&endpoint);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::from)?;
        Ok(Self {
            client,
            endpoint,
            name,
        })
    }
}

#[async_trait]
impl ResolverProvider for InstagramProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn resolve(&self, source_url: &str) -> Result<ProviderPayload, ProviderError> {
        trace!(provider = %self.name, source_url, "calling instagram provider");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", source_url)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Http(format!(
                "provider returned status {status}"
            )));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if !envelope.success {
            return Err(ProviderError::Upstream(
                envelope.message.unwrap_or_else(|| "unspecified".into()),
            ));
        }

        let video_url = envelope
            .video_url
            .ok_or_else(|| ProviderError::Malformed("success envelope without video_url".into()))?;

        Ok(ProviderPayload::Instagram {
            video_url,
            thumbnail_url: envelope.thumbnail_url,
            owner: envelope.owner,
            caption: envelope.caption,
        })
    }
}
