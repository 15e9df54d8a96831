use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use unfurl_service::ServiceError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Wraps the service taxonomy for the HTTP edge.
///
/// Upstream exhaustion maps to 503 so callers can retry later, clearly
/// distinct from the 500 a broken store produces.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::UnsupportedUrl(url) => (
                StatusCode::BAD_REQUEST,
                format!("unsupported platform url: {url}"),
            ),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "short link not found".to_string()),
            ServiceError::UpstreamExhausted { platform } => {
                tracing::warn!(%platform, "all upstream resolvers exhausted");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("{platform} resolvers are temporarily unavailable, try again later"),
                )
            }
            ServiceError::MediaUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "media is temporarily unavailable".to_string(),
            ),
            ServiceError::Storage(msg) => {
                tracing::error!(error = %msg, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
            ServiceError::IdSpaceSaturated(attempts) => {
                tracing::error!(attempts, "short id allocation saturated");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "could not allocate a short id".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
