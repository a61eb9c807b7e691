use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Empty};
use commuter_shared::{ApiJson, SessionScope};

use crate::models::{non_blank, normalize_email, UserInfo};
use crate::routes::validate_body;
use crate::services::profile_service;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EntryRequest {
    #[validate(required, custom = "non_blank")]
    pub email: Option<String>,
    #[validate(required)]
    pub user_info: Option<UserInfo>,
}

/// Writes onboarding answers to the profile matching `email`.
#[utoipa::path(
    post,
    path = "/api/entry",
    tag = "Profile",
    request_body = EntryRequest,
    responses(
        (status = 200, description = "Profile updated successfully"),
        (status = 400, description = "Email and user info are required", body = ApiErrorResponse),
        (status = 500, description = "Failed to update profile", body = ApiErrorResponse),
    )
)]
pub async fn update_entry(
    scope: SessionScope,
    ApiJson(req): ApiJson<EntryRequest>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    validate_body(&req, "Email and user info are required")?;
    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    let info = req.user_info.unwrap_or_default();

    let bearer = scope.bearer();
    profile_service::update_user_info(scope.backend(), bearer.as_deref(), &email, &info)
        .await
        .map_err(|e| AppError::with_error(ErrorCode::InternalError, "Failed to update profile", e.to_string()))?;

    tracing::info!(email = %email, "profile updated");
    Ok(Json(ApiResponse::message("Profile updated successfully")))
}
