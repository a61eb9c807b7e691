use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Identity record owned by the auth backend. Fields the service does not
/// look at are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            extra: Map::new(),
        }
    }
}

/// Bearer credential issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>, user: User) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            expires_in: None,
            expires_at: None,
            user,
        }
    }
}

/// Result of sign up / sign in. Sign up leaves `session` empty until the
/// email address is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Tokens read from the caller's own cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Parameters for creating an account.
#[derive(Debug, Clone)]
pub struct SignUpParams<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: Option<&'a str>,
    pub redirect_to: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_keeps_unknown_fields() {
        let raw = json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "email": "rider@example.com",
            "aud": "authenticated",
            "user_metadata": { "name": "Rider" }
        });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.email.as_deref(), Some("rider@example.com"));
        assert_eq!(user.extra["aud"], "authenticated");
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn session_defaults_optional_fields() {
        let session: Session = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "user": { "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7" }
        }))
        .unwrap();
        assert_eq!(session.token_type, "bearer");
        assert!(session.expires_in.is_none());
        assert!(session.user.email.is_none());
    }
}
