use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Session, SignUpParams, User};
use commuter_shared::{ApiJson, SessionScope};

use crate::models::{non_blank, normalize_email};
use crate::routes::validate_body;
use crate::services::profile_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Creates an account after checking the email is not taken.
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created, pending email verification. Returns `user` and `session`"),
        (status = 400, description = "Missing fields or sign up refused by the backend", body = ApiErrorResponse),
        (status = 409, description = "A profile with this email already exists", body = ApiErrorResponse),
        (status = 500, description = "Email lookup or backend failure", body = ApiErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    scope: SessionScope,
    ApiJson(req): ApiJson<SignupRequest>,
) -> AppResult<Json<ApiResponse<SignupResponse>>> {
    validate_body(&req, "Email and password are required")?;
    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    let password = req.password.unwrap_or_default();
    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let exists = profile_service::email_exists(scope.backend(), None, &email)
        .await
        .map_err(|e| AppError::with_error(ErrorCode::InternalError, "Error checking user email.", e.to_string()))?;
    if exists {
        return Err(AppError::new(
            ErrorCode::EmailAlreadyExists,
            "Email already exists. Please log in instead.",
        ));
    }

    let redirect_to = state.config.email_redirect_url();
    let auth = scope
        .backend()
        .sign_up(SignUpParams {
            email: &email,
            password: &password,
            name,
            redirect_to: Some(&redirect_to),
        })
        .await
        .map_err(|e| {
            AppError::backend(
                ErrorCode::SignupFailed,
                "Signup failed. Invalid credentials or other error.",
                e,
            )
        })?;

    if let Some(session) = &auth.session {
        scope.store(session);
    }

    tracing::info!(
        email = %email,
        user_id = ?auth.user.as_ref().map(|u| u.id),
        "user signed up"
    );

    Ok(Json(ApiResponse::ok_with_message(
        SignupResponse {
            user: auth.user,
            session: auth.session,
        },
        "Signup successful. Please verify your email.",
    )))
}
