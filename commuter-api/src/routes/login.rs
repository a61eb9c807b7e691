use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Session, User};
use commuter_shared::{ApiJson, SessionScope};

use crate::models::{non_blank, normalize_email};
use crate::routes::validate_body;
use crate::services::profile_service;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required, custom = "non_blank")]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Option<User>,
    pub session: Session,
    pub onboard: Option<bool>,
}

/// Password sign in. The issued session is written to the caller's cookies
/// and must be readable back before the login counts as successful.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful. Returns `user`, `session` and `onboard`; session cookies are set"),
        (status = 400, description = "Email or password missing", body = ApiErrorResponse),
        (status = 401, description = "Invalid credentials, or the new session could not be confirmed", body = ApiErrorResponse),
        (status = 500, description = "Backend or profile lookup failure", body = ApiErrorResponse),
    )
)]
pub async fn login(
    scope: SessionScope,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    validate_body(&req, "Email and password are required")?;
    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    let password = req.password.unwrap_or_default();

    let auth = scope
        .backend()
        .sign_in_with_password(&email, &password)
        .await
        .map_err(|e| AppError::backend(ErrorCode::InvalidCredentials, "Invalid credentials", e))?;

    if let Some(session) = &auth.session {
        scope.store(session);
    }

    let session = scope.check_session().await.into_session()?;

    let onboard = profile_service::onboard_flag(scope.backend(), Some(&session.access_token), &email)
        .await
        .map_err(|e| AppError::with_error(ErrorCode::InternalError, "Error fetching profile", e.to_string()))?;

    tracing::info!(user_id = %session.user.id, email = %email, "user logged in");

    Ok(Json(ApiResponse::ok_with_message(
        LoginResponse {
            user: auth.user,
            session,
            onboard,
        },
        "Login successful",
    )))
}
