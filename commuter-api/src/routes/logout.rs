use axum::Json;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Empty};
use commuter_shared::SessionScope;

/// Revokes the session with the backend when there is one and clears the
/// session cookies either way.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Session",
    responses(
        (status = 200, description = "Logged out successfully; session cookies cleared"),
        (status = 500, description = "Error during logout", body = ApiErrorResponse),
    )
)]
pub async fn logout(scope: SessionScope) -> AppResult<Json<ApiResponse<Empty>>> {
    if let Some(access_token) = scope.tokens().access_token {
        if let Err(err) = scope.backend().sign_out(&access_token).await {
            // An expired token cannot be revoked but the cookies still go.
            if !err.is_client_rejection() {
                scope.clear();
                return Err(AppError::with_error(
                    ErrorCode::InternalError,
                    "Error during logout",
                    err.to_string(),
                ));
            }
            tracing::debug!(error = %err, "backend refused sign out");
        }
    }

    scope.clear();
    tracing::info!("user logged out");
    Ok(Json(ApiResponse::message("Logged out successfully")))
}
