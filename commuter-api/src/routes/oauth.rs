use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::session::pkce;
use commuter_shared::types::ApiErrorResponse;
use commuter_shared::SessionScope;

use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeQuery {
    /// OAuth provider name, e.g. `google`.
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// Authorization code issued by the provider.
    pub code: Option<String>,
}

/// 302 rather than axum's `Redirect::to` (303).
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Starts a provider sign in: remembers a PKCE verifier in a cookie and
/// sends the browser to the backend's authorize endpoint.
#[utoipa::path(
    get,
    path = "/api/auth/authorize",
    tag = "Auth",
    params(AuthorizeQuery),
    responses(
        (status = 302, description = "Redirect to the provider's authorize page; PKCE verifier cookie set"),
        (status = 400, description = "Missing provider", body = ApiErrorResponse),
    )
)]
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    scope: SessionScope,
    Query(query): Query<AuthorizeQuery>,
) -> AppResult<Response> {
    let provider = query
        .provider
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing or invalid provider parameter"))?;

    let verifier = pkce::generate_verifier();
    scope.store_code_verifier(&verifier);

    let redirect_to = format!("{}/api/auth/callback", state.config.site_url.trim_end_matches('/'));
    let url = scope
        .backend()
        .authorize_url(provider, &redirect_to, &pkce::challenge(&verifier));

    tracing::debug!(provider, "redirecting to oauth provider");
    Ok(found(url))
}

/// Exchanges the provider's code for a session, confirms the session is
/// readable and sends the browser back to the site.
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = "Auth",
    params(CallbackQuery),
    responses(
        (status = 302, description = "Session stored in cookies; redirect to the site"),
        (status = 400, description = "Missing code", body = ApiErrorResponse),
        (status = 401, description = "Code rejected or session not active", body = ApiErrorResponse),
        (status = 500, description = "Backend failure", body = ApiErrorResponse),
    )
)]
pub async fn callback(
    State(state): State<Arc<AppState>>,
    scope: SessionScope,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Response> {
    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing or invalid code parameter"))?;

    let verifier = scope.code_verifier();
    let session = scope
        .backend()
        .exchange_code_for_session(code, verifier.as_deref())
        .await
        .map_err(|e| AppError::backend(ErrorCode::OAuthError, "Invalid or expired code", e))?;

    if verifier.is_some() {
        scope.clear_code_verifier();
    }
    scope.store(&session);

    let session = scope.check_session().await.into_session()?;
    tracing::info!(user_id = %session.user.id, "oauth sign in completed");

    Ok(found(state.config.site_url.clone()))
}
