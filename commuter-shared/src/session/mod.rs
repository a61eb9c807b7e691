//! Request scoped session handling.
//!
//! [`SessionScope`] is built for every request from that request's own
//! cookies. Session lookups never go through shared session state, so two
//! users hitting the service concurrently cannot see each other's session.

pub mod cookies;
pub mod pkce;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tower_cookies::Cookies;
use utoipa::ToSchema;

use crate::backend::{Backend, BackendError};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::types::{Session, SessionTokens};

pub use cookies::CookiePolicy;

/// Application state that can hand out the backend handle.
pub trait SessionState: Send + Sync {
    fn backend(&self) -> Arc<dyn Backend>;

    fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::default()
    }
}

impl<T: SessionState> SessionState for Arc<T> {
    fn backend(&self) -> Arc<dyn Backend> {
        (**self).backend()
    }

    fn cookie_policy(&self) -> CookiePolicy {
        (**self).cookie_policy()
    }
}

/// Normalized outcome of "is there an active session for this request".
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionCheck {
    pub status: u16,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub session: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionCheck {
    pub fn active(session: Session) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: "Session active".to_string(),
            session: Some(session),
            error: None,
        }
    }

    pub fn inactive(error: Option<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            message: "Session not active".to_string(),
            session: None,
            error: Some(error.unwrap_or_else(|| "Unknown error".to_string())),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: "Error checking session".to_string(),
            session: None,
            error: Some(error.into()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The confirmed session, or an error carrying this outcome's status and
    /// message verbatim.
    pub fn into_session(self) -> AppResult<Session> {
        let status = self.status_code();
        match self.session {
            Some(session) if status == StatusCode::OK => Ok(session),
            _ => Err(AppError::Known {
                code: ErrorCode::from_status(status),
                message: self.message,
                error: self.error,
            }),
        }
    }
}

impl IntoResponse for SessionCheck {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Backend handle bound to the cookies of one request.
pub struct SessionScope {
    backend: Arc<dyn Backend>,
    cookies: Cookies,
    policy: CookiePolicy,
}

impl SessionScope {
    pub fn new(backend: Arc<dyn Backend>, cookies: Cookies, policy: CookiePolicy) -> Self {
        Self {
            backend,
            cookies,
            policy,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn tokens(&self) -> SessionTokens {
        cookies::read_tokens(&self.cookies)
    }

    /// Bearer for table operations: the caller's access token, if any.
    pub fn bearer(&self) -> Option<String> {
        self.tokens().access_token
    }

    pub fn store(&self, session: &Session) {
        cookies::write_session(&self.cookies, self.policy, session);
    }

    pub fn clear(&self) {
        cookies::clear_session(&self.cookies, self.policy);
    }

    pub fn code_verifier(&self) -> Option<String> {
        cookies::read_code_verifier(&self.cookies)
    }

    pub fn store_code_verifier(&self, verifier: &str) {
        cookies::write_code_verifier(&self.cookies, self.policy, verifier);
    }

    pub fn clear_code_verifier(&self) {
        cookies::clear_code_verifier(&self.cookies, self.policy);
    }

    /// Looks up the session behind this request's cookies. Sessions that had
    /// to be refreshed on the way are written back.
    pub async fn check_session(&self) -> SessionCheck {
        let tokens = self.tokens();
        if tokens.is_empty() {
            tracing::debug!("no session cookies on request");
            return SessionCheck::inactive(None);
        }

        match self.backend.get_session(&tokens).await {
            Ok(Some(session)) => {
                if tokens.access_token.as_deref() != Some(session.access_token.as_str()) {
                    self.store(&session);
                }
                tracing::debug!(user_id = %session.user.id, "session active");
                SessionCheck::active(session)
            }
            Ok(None) => SessionCheck::inactive(None),
            Err(err @ BackendError::Api { .. }) => {
                tracing::debug!(error = %err, "session not active");
                SessionCheck::inactive(Some(err.to_string()))
            }
            Err(err) => {
                tracing::error!(error = %err, "error during session check");
                SessionCheck::failed(err.to_string())
            }
        }
    }

    /// Trades the refresh token cookie for a new session. `Ok(None)` when the
    /// request carries no refresh token.
    pub async fn refresh(&self) -> Result<Option<Session>, BackendError> {
        let Some(refresh_token) = self.tokens().refresh_token else {
            return Ok(None);
        };

        let session = self.backend.refresh_session(&refresh_token).await?;
        self.store(&session);
        Ok(Some(session))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionScope
where
    S: SessionState,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::internal(msg))?;

        Ok(Self::new(state.backend(), cookies, state.cookie_policy()))
    }
}
