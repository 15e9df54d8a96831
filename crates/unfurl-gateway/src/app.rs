use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::health::health_handler;
use crate::handlers::link::{create_link_handler, link_info_handler, visit_link_handler};
use crate::state::AppState;

/// Builds the gateway router.
///
/// Static routes (`/health`, `/resolve`) and the `/info/` prefix match
/// ahead of the catch-all visit route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/resolve", post(create_link_handler))
        .route("/info/{short_id}", get(link_info_handler))
        .route("/{short_id}", get(visit_link_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
