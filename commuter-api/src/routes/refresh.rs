use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use commuter_shared::types::Session;
use commuter_shared::SessionScope;

/// Refresh outcome; `session` is always present, `null` on failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub status: u16,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub session: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefreshResponse {
    fn new(status: StatusCode, message: &str, session: Option<Session>, error: Option<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            session,
            error,
        }
    }
}

impl IntoResponse for RefreshResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Trades the refresh token cookie for a new session and rewrites the
/// session cookies.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Session",
    responses(
        (status = 200, description = "Session refreshed successfully", body = RefreshResponse),
        (status = 401, description = "No refresh token, or the backend refused it", body = RefreshResponse),
        (status = 500, description = "Server error during session refresh", body = RefreshResponse),
    )
)]
pub async fn refresh(scope: SessionScope) -> RefreshResponse {
    match scope.refresh().await {
        Ok(Some(session)) => {
            tracing::info!(user_id = %session.user.id, "session refreshed");
            RefreshResponse::new(StatusCode::OK, "Session refreshed successfully", Some(session), None)
        }
        Ok(None) => RefreshResponse::new(StatusCode::UNAUTHORIZED, "Unable to refresh session", None, None),
        Err(err) if err.is_rejection() => {
            tracing::debug!(error = %err, "refresh rejected");
            RefreshResponse::new(
                StatusCode::UNAUTHORIZED,
                "Unable to refresh session",
                None,
                Some(err.to_string()),
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "error during session refresh");
            RefreshResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during session refresh",
                None,
                Some(err.to_string()),
            )
        }
    }
}
