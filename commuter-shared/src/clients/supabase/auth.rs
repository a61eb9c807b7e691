use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{check, SupabaseClient};
use crate::backend::{BackendError, BackendResult};
use crate::types::{AuthResponse, Session, SessionTokens, SignUpParams, User};

/// `/signup` answers with a session when autoconfirm is on and with the bare
/// user when the address still has to be verified.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(Session),
    User(User),
}

impl SupabaseClient {
    pub async fn sign_up(&self, params: SignUpParams<'_>) -> BackendResult<AuthResponse> {
        let mut body = json!({
            "email": params.email,
            "password": params.password,
        });
        if let Some(name) = params.name {
            body["data"] = json!({ "name": name });
        }

        let mut req = self.http.post(self.auth_endpoint("/signup")).json(&body);
        if let Some(redirect_to) = params.redirect_to {
            req = req.query(&[("redirect_to", redirect_to)]);
        }

        let response = check(self.authorize(req, None).send().await?).await?;
        let parsed = match response.json::<SignUpBody>().await? {
            SignUpBody::Session(session) => AuthResponse {
                user: Some(session.user.clone()),
                session: Some(session),
            },
            SignUpBody::User(user) => AuthResponse {
                user: Some(user),
                session: None,
            },
        };

        tracing::debug!(email = %params.email, confirmed = parsed.session.is_some(), "backend sign up");
        Ok(parsed)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<AuthResponse> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;

        Ok(AuthResponse {
            user: Some(session.user.clone()),
            session: Some(session),
        })
    }

    pub async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> BackendResult<Session> {
        self.token_grant(
            "pkce",
            json!({ "auth_code": code, "code_verifier": code_verifier.unwrap_or_default() }),
        )
        .await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn get_user(&self, access_token: &str) -> BackendResult<User> {
        let req = self.http.get(self.auth_endpoint("/user"));
        let response = check(self.authorize(req, Some(access_token)).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Validates the access token with the backend; on rejection falls back to
    /// a single refresh when a refresh token is available.
    pub async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<Session>> {
        let refresh_token = tokens.refresh_token.as_deref();

        if let Some(access_token) = tokens.access_token.as_deref() {
            match self.get_user(access_token).await {
                Ok(user) => {
                    let session =
                        Session::new(access_token, refresh_token.unwrap_or_default(), user);
                    return Ok(Some(session));
                }
                Err(err) if err.is_client_rejection() && refresh_token.is_some() => {
                    tracing::debug!(error = %err, "access token rejected, refreshing");
                }
                Err(err) => return Err(err),
            }
        }

        match refresh_token {
            Some(refresh_token) => self.refresh_session(refresh_token).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        let req = self
            .http
            .post(self.auth_endpoint("/logout"))
            .query(&[("scope", "local")]);
        check(self.authorize(req, Some(access_token)).send().await?).await?;
        Ok(())
    }

    pub fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> String {
        let base = self.auth_endpoint("/authorize");
        let params = [
            ("provider", provider),
            ("redirect_to", redirect_to),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "s256"),
        ];
        match Url::parse_with_params(&base, &params) {
            Ok(url) => url.into(),
            Err(err) => {
                tracing::warn!(error = %err, "could not build authorize url");
                base
            }
        }
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> BackendResult<Session> {
        let req = self
            .http
            .post(self.auth_endpoint("/token"))
            .query(&[("grant_type", grant_type)])
            .json(&body);

        let response = check(self.authorize(req, None).send().await?).await?;
        response
            .json::<Session>()
            .await
            .map_err(|e| BackendError::Decode(format!("{grant_type} grant: {e}")))
    }
}
