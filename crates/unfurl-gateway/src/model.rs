use serde::{Deserialize, Serialize};
use unfurl_core::MediaDescriptor;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub short_id: String,
    pub short_url: String,
    pub media: MediaDescriptor,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub short_id: String,
    pub media: Option<MediaDescriptor>,
}

/// Query parameters on the visit endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct VisitQuery {
    /// Asset-kind hint; `music` or `audio` selects the audio-only asset.
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
