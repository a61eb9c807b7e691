use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, User};
use commuter_shared::SessionScope;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[utoipa::path(
    get,
    path = "/api/get-user",
    tag = "Session",
    responses(
        (status = 200, description = "The signed in user, as `user`"),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    )
)]
pub async fn get_user(scope: SessionScope) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let check = scope.check_session().await;
    match check.status_code() {
        StatusCode::OK => {}
        StatusCode::UNAUTHORIZED => return Err(AppError::unauthorized("Unauthorized")),
        _ => {
            return Err(AppError::Known {
                code: ErrorCode::InternalError,
                message: "Internal server error".to_string(),
                error: check.error,
            })
        }
    }

    let session = check.into_session()?;
    Ok(Json(ApiResponse::ok(UserResponse { user: session.user })))
}
