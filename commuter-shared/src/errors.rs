use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth and session errors
/// - E3xxx: Report errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    BadRequest,

    // Auth (E1xxx)
    InvalidCredentials,
    EmailAlreadyExists,
    SessionInactive,
    OAuthError,
    SignupFailed,

    // Reports (E3xxx)
    ReportNotFound,
    LikesNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::BadRequest => "E0008",

            // Auth
            Self::InvalidCredentials => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::SessionInactive => "E1003",
            Self::OAuthError => "E1007",
            Self::SignupFailed => "E1008",

            // Reports
            Self::ReportNotFound => "E3001",
            Self::LikesNotFound => "E3002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::SignupFailed => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ReportNotFound | Self::LikesNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::SessionInactive
            | Self::OAuthError => StatusCode::UNAUTHORIZED,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
        }
    }

    /// Inverse of [`ErrorCode::status_code`] for statuses produced outside the
    /// handlers, such as a session check outcome.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest,
            StatusCode::UNAUTHORIZED => Self::SessionInactive,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::EmailAlreadyExists,
            _ => Self::InternalError,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        error: Option<String>,
    },
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            error: None,
        }
    }

    /// Error carrying the underlying cause in the response's `error` field.
    pub fn with_error(code: ErrorCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            error: Some(error.into()),
        }
    }

    /// Maps a backend failure: an error object returned by the backend becomes
    /// `rejected` with `message`, anything else is an internal error.
    pub fn backend(rejected: ErrorCode, message: impl Into<String>, err: BackendError) -> Self {
        match err {
            BackendError::Api { .. } => Self::with_error(rejected, message, err.to_string()),
            other => Self::with_error(ErrorCode::InternalError, "Internal server error", other.to_string()),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Known { code, .. } => code.status_code(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::with_error(ErrorCode::BadRequest, "Invalid request body", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Known { code, message, error } => {
                if status.is_server_error() {
                    tracing::error!(code = code.code(), error = ?error, "{message}");
                } else {
                    tracing::debug!(code = code.code(), error = ?error, "{message}");
                }
                let resp = ApiErrorResponse::new(status, message);
                match error {
                    Some(e) => resp.with_error(e),
                    None => resp,
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
