use crate::provider::{ProviderError, ResolverProvider};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;
use unfurl_core::descriptor::TikTokAuthor;
use unfurl_core::{Platform, ProviderPayload};

/// Rate-limit code in the tikwm-style error envelope.
const ENVELOPE_RATE_LIMITED: i64 = -2;

/// A tikwm-style TikTok resolver provider.
///
/// Speaks JSON POST `{ url, hd }` against `{endpoint}/api/` and expects
/// the `{ code, msg, data }` envelope, where `code == 0` is success.
pub struct TikTokProvider {
    client: Client,
    endpoint: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    play: String,
    #[serde(default)]
    hdplay: Option<String>,
    #[serde(default)]
    music: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    play_count: Option<u64>,
    #[serde(default)]
    digg_count: Option<u64>,
    #[serde(default)]
    comment_count: Option<u64>,
    #[serde(default)]
    share_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Author {
    unique_id: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl TikTokProvider {
    /// Creates a provider against the given endpoint base URL
    /// (e.g. `https://www.tikwm.com`). Tests point this at a mock server.
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
impl ResolverProvider for TikTokProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn resolve(&self, source_url: &str) -> Result<ProviderPayload, ProviderError> {
        let url = format!("{}/api/", self.endpoint);
        trace!(provider = %self.name, source_url, "calling tiktok provider");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "url": source_url, "hd": 1 }))
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

        if envelope.code == ENVELOPE_RATE_LIMITED {
            return Err(ProviderError::RateLimited);
        }
        if envelope.code != 0 {
            return Err(ProviderError::Upstream(
                envelope.msg.unwrap_or_else(|| format!("code {}", envelope.code)),
            ));
        }

        let data = envelope
            .data
            .ok_or_else(|| ProviderError::Malformed("success envelope without data".into()))?;

        Ok(ProviderPayload::TikTok {
            play: data.play,
            hdplay: data.hdplay,
            music: data.music,
            cover: data.cover,
            title: data.title,
            author: data.author.map(|a| TikTokAuthor {
                unique_id: a.unique_id,
                nickname: a.nickname,
                avatar: a.avatar,
            }),
            play_count: data.play_count,
            digg_count: data.digg_count,
            comment_count: data.comment_count,
            share_count: data.share_count,
        })
    }
}

pub(crate) fn host_label(endpoint: &str) -> String {
    endpoint
        .split("://")
        .nth(1)
        .unwrap_or(endpoint)
        .split('/')
        .next()
        .unwrap_or(endpoint)
        .to_string()
}
