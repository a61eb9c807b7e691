//! The seam between route handlers and the hosted auth/database backend.
//!
//! Handlers only ever talk to `dyn Backend`. The production implementation is
//! [`crate::clients::supabase::SupabaseClient`]; tests swap in an in-memory
//! double.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::{AuthResponse, Session, SessionTokens, SignUpParams, User};

/// PostgREST code for "JSON object requested, multiple (or no) rows returned".
pub const NO_SINGLE_ROW: &str = "PGRST116";

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend answered with an error object.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced an answer.
    #[error("backend request failed: {0}")]
    Transport(String),

    /// The backend answered with something we could not read.
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn api(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Zero (or several) rows where exactly one was requested.
    pub fn no_single_row(count: usize) -> Self {
        Self::api(
            406,
            Some(NO_SINGLE_ROW),
            format!("JSON object requested, multiple (or no) rows returned (the result contains {count} rows)"),
        )
    }

    /// True for error objects the backend returned on purpose, as opposed to
    /// transport or decoding failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// True for a client-side rejection (4xx) from the backend.
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    /// Zero or several rows came back where one was requested.
    pub fn is_no_single_row(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == NO_SINGLE_ROW)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Equality filters joined with AND, rendered as PostgREST query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.conditions.push((column.into(), value.to_string()));
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{value}")))
            .collect()
    }

    /// Whether a JSON row satisfies every condition.
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|(column, value)| match row.get(column) {
            Some(Value::String(s)) => s == value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *value,
        })
    }
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub columns: String,
    pub filter: Filter,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filter: Filter::new(),
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filter = self.filter.eq(column, value);
        self
    }
}

/// Capabilities of the hosted backend. Table operations take the caller's
/// bearer token so row level security applies per user; `None` falls back
/// to the anonymous key.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(&self, params: SignUpParams<'_>) -> BackendResult<AuthResponse>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<AuthResponse>;

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> BackendResult<Session>;

    /// Resolves the caller's tokens into an active session, refreshing once
    /// when the access token is rejected. `Ok(None)` means there is nothing
    /// to resolve.
    async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<Session>>;

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session>;

    async fn get_user(&self, access_token: &str) -> BackendResult<User>;

    async fn sign_out(&self, access_token: &str) -> BackendResult<()>;

    /// URL that starts the provider's OAuth flow with a PKCE challenge.
    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> String;

    /// Exactly one row, or a [`NO_SINGLE_ROW`] rejection.
    async fn select_single(&self, bearer: Option<&str>, query: &TableQuery) -> BackendResult<Value>;

    /// Zero or one row.
    async fn select_maybe_single(
        &self,
        bearer: Option<&str>,
        query: &TableQuery,
    ) -> BackendResult<Option<Value>>;

    async fn insert(&self, bearer: Option<&str>, table: &str, row: Value) -> BackendResult<()>;

    async fn update(
        &self,
        bearer: Option<&str>,
        table: &str,
        filter: &Filter,
        patch: Value,
    ) -> BackendResult<()>;
}
