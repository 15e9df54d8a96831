use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The social-media platform a source URL belongs to.
///
/// Detection is host-based. URLs that match no supported platform are
/// rejected at validation time rather than stored with an unknown tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    TikTok,
    Instagram,
    Twitter,
}

impl Platform {
    /// Detects the platform of a source URL by host pattern matching.
    pub fn detect(source_url: &str) -> Result<Self, CoreError> {
        let host = host_of(source_url)
            .ok_or_else(|| CoreError::UnsupportedUrl(source_url.to_string()))?;

        if matches_domain(&host, "tiktok.com") {
            return Ok(Platform::TikTok);
        }
        if matches_domain(&host, "instagram.com") || matches_domain(&host, "instagr.am") {
            return Ok(Platform::Instagram);
        }
        if matches_domain(&host, "twitter.com") || matches_domain(&host, "x.com") {
            return Ok(Platform::Twitter);
        }

        Err(CoreError::UnsupportedUrl(source_url.to_string()))
    }

    /// Extracts the numeric status id from a Twitter/X post URL.
    ///
    /// Accepts the canonical `/{user}/status/{id}` path shape, ignoring
    /// any query string or trailing path segments (`/photo/1` etc.).
    pub fn twitter_status_id(source_url: &str) -> Option<u64> {
        let path = source_url.split("://").nth(1)?;
        let mut segments = path.split(['/', '?']).skip(1);
        while let Some(segment) = segments.next() {
            if segment == "status" || segment == "statuses" {
                return segments.next()?.parse().ok();
            }
        }
        None
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::TikTok => write!(f, "tiktok"),
            Platform::Instagram => write!(f, "instagram"),
            Platform::Twitter => write!(f, "twitter"),
        }
    }
}

/// Extracts the host portion of an http(s) URL, lowercased, without
/// userinfo or port.
fn host_of(url: &str) -> Option<String> {
    let rest = url.split("://").nth(1)?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// True when `host` equals `domain` or is a subdomain of it.
fn matches_domain(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
