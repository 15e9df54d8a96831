use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use tracing::{debug, instrument};
use unfurl_core::{AssetKind, ShortId};
use unfurl_service::{negotiate, Negotiation, RequestContext, ServiceError};

use crate::error::{ApiError, Result};
use crate::model::{InfoResponse, ResolveRequest, ResolveResponse, VisitQuery};
use crate::render;
use crate::state::AppState;
use crate::visit;

/// `POST /resolve` — create a short link for a platform URL.
#[instrument(skip(state, request), fields(url = %request.url))]
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>> {
    let created = state.resolver().create(&request.url).await?;
    debug!(short_id = %created.short_id, platform = %created.platform, "short link created");

    Ok(Json(ResolveResponse {
        success: true,
        short_url: created.short_id.to_url(state.base_url()),
        short_id: created.short_id.into_inner(),
        media: created.descriptor,
    }))
}

/// `GET /{short_id}` — the visit endpoint.
///
/// Crawlers and video-accepting clients are 307-redirected to the media
/// asset; browsers get the HTML preview page. Either way the visit is
/// recorded off the request path.
#[instrument(skip(state, headers, query))]
pub async fn visit_link_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    Query(query): Query<VisitQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    // A malformed id can never be a stored link.
    let short_id = ShortId::new(short_id).map_err(|_| ApiError::from(ServiceError::NotFound))?;

    let resolved = state.resolver().resolve(&short_id).await?;

    let user_agent = header_str(&headers, header::USER_AGENT);
    let accept = header_str(&headers, header::ACCEPT);
    let ctx = RequestContext {
        user_agent,
        accept,
        asset_kind: asset_kind_of(&query),
    };

    visit::record_detached(
        state.visits().clone(),
        short_id.as_str().to_string(),
        user_agent.map(str::to_string),
    );

    let response = match negotiate(&resolved.descriptor, &ctx) {
        Negotiation::Redirect(asset_url) => Redirect::temporary(&asset_url).into_response(),
        Negotiation::Preview => Html(
            render::preview_page(short_id.as_str(), &resolved.descriptor).into_string(),
        )
        .into_response(),
    };
    Ok(response)
}

/// `GET /info/{short_id}` — the persisted descriptor, no refresh.
#[instrument(skip(state))]
pub async fn link_info_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<InfoResponse>> {
    let short_id = ShortId::new(short_id).map_err(|_| ApiError::from(ServiceError::NotFound))?;
    let media = state.resolver().info(&short_id).await?;

    Ok(Json(InfoResponse {
        short_id: short_id.into_inner(),
        media,
    }))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn asset_kind_of(query: &VisitQuery) -> AssetKind {
    match query.asset_type.as_deref() {
        Some("music") | Some("audio") => AssetKind::Audio,
        _ => AssetKind::Video,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn music_query_selects_audio() {
        let query = VisitQuery {
            asset_type: Some("music".into()),
        };
        assert_eq!(asset_kind_of(&query), AssetKind::Audio);

        let query = VisitQuery {
            asset_type: Some("audio".into()),
        };
        assert_eq!(asset_kind_of(&query), AssetKind::Audio);
    }

    #[test]
    fn anything_else_defaults_to_video() {
        assert_eq!(asset_kind_of(&VisitQuery::default()), AssetKind::Video);

        let query = VisitQuery {
            asset_type: Some("gif".into()),
        };
        assert_eq!(asset_kind_of(&query), AssetKind::Video);
    }
}
