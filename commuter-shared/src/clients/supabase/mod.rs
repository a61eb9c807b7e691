//! HTTP client for a hosted Supabase project: GoTrue for auth, PostgREST
//! for tables.
//!
//! One `SupabaseClient` is built at startup and shared by every request. It
//! holds no per-user state; the caller's tokens are passed into each call.

mod auth;
mod rest;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::backend::{Backend, BackendError, BackendResult, Filter, TableQuery};
use crate::types::{AuthResponse, Session, SessionTokens, SignUpParams, User};

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    url: String,
    anon_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient").field("url", &self.url).finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self, BackendError> {
        let url = url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BackendError::Transport(format!("invalid backend url: {url:?}")));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("commuter-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url,
            anon_key: anon_key.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.url)
    }

    fn rest_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url)
    }

    /// Attaches the project key and the bearer, which defaults to the key.
    fn authorize(&self, req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }
}

/// Error object shapes returned by GoTrue and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            _ => self.error.clone(),
        })
    }

    fn message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Passes successful responses through and turns error statuses into
/// [`BackendError::Api`].
async fn check(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(status = status.as_u16(), error = %err, "could not read backend error body");
            String::new()
        }
    };
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let code = body.code();
    let message = body
        .message()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| if text.is_empty() { status.to_string() } else { text });

    tracing::debug!(status = status.as_u16(), code = ?code, message = %message, "backend rejected request");

    Err(BackendError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_up(&self, params: SignUpParams<'_>) -> BackendResult<AuthResponse> {
        SupabaseClient::sign_up(self, params).await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<AuthResponse> {
        SupabaseClient::sign_in_with_password(self, email, password).await
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> BackendResult<Session> {
        SupabaseClient::exchange_code_for_session(self, code, code_verifier).await
    }

    async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<Session>> {
        SupabaseClient::get_session(self, tokens).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        SupabaseClient::refresh_session(self, refresh_token).await
    }

    async fn get_user(&self, access_token: &str) -> BackendResult<User> {
        SupabaseClient::get_user(self, access_token).await
    }

    async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        SupabaseClient::sign_out(self, access_token).await
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> String {
        SupabaseClient::authorize_url(self, provider, redirect_to, code_challenge)
    }

    async fn select_single(&self, bearer: Option<&str>, query: &TableQuery) -> BackendResult<Value> {
        SupabaseClient::select_single(self, bearer, query).await
    }

    async fn select_maybe_single(
        &self,
        bearer: Option<&str>,
        query: &TableQuery,
    ) -> BackendResult<Option<Value>> {
        SupabaseClient::select_maybe_single(self, bearer, query).await
    }

    async fn insert(&self, bearer: Option<&str>, table: &str, row: Value) -> BackendResult<()> {
        SupabaseClient::insert(self, bearer, table, row).await
    }

    async fn update(
        &self,
        bearer: Option<&str>,
        table: &str,
        filter: &Filter,
        patch: Value,
    ) -> BackendResult<()> {
        SupabaseClient::update(self, bearer, table, filter, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_urls_without_scheme() {
        let result = SupabaseClient::new("project.supabase.co", "key", Duration::from_secs(5));
        assert!(matches!(result, Err(BackendError::Transport(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = SupabaseClient::new("https://project.supabase.co/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(client.auth_endpoint("/user"), "https://project.supabase.co/auth/v1/user");
        assert_eq!(client.rest_endpoint("reports"), "https://project.supabase.co/rest/v1/reports");
    }

    #[test]
    fn error_body_prefers_gotrue_msg() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.code().as_deref(), Some("invalid_credentials"));
        assert_eq!(body.message().as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn error_body_reads_postgrest_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
        )
        .unwrap();
        assert_eq!(body.code().as_deref(), Some("PGRST116"));
        assert!(body.message().unwrap().starts_with("JSON object requested"));
    }
}
