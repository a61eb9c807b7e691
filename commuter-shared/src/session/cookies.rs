use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::types::{Session, SessionTokens};

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";
pub const CODE_VERIFIER_COOKIE: &str = "sb-code-verifier";

const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
const REFRESH_TTL_SECS: i64 = 30 * 24 * 3600;
const CODE_VERIFIER_TTL_SECS: i64 = 600;

/// Attributes shared by every cookie the service writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }

    fn expired(&self, name: &'static str) -> Cookie<'static> {
        self.build(name, String::new(), Duration::ZERO)
    }
}

pub fn read_tokens(cookies: &Cookies) -> SessionTokens {
    let value = |name: &str| {
        cookies
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    };

    SessionTokens {
        access_token: value(ACCESS_TOKEN_COOKIE),
        refresh_token: value(REFRESH_TOKEN_COOKIE),
    }
}

pub fn write_session(cookies: &Cookies, policy: CookiePolicy, session: &Session) {
    let access_ttl = session.expires_in.unwrap_or(DEFAULT_ACCESS_TTL_SECS);
    cookies.add(policy.build(
        ACCESS_TOKEN_COOKIE,
        session.access_token.clone(),
        Duration::seconds(access_ttl),
    ));
    if !session.refresh_token.is_empty() {
        cookies.add(policy.build(
            REFRESH_TOKEN_COOKIE,
            session.refresh_token.clone(),
            Duration::seconds(REFRESH_TTL_SECS),
        ));
    }
}

pub fn clear_session(cookies: &Cookies, policy: CookiePolicy) {
    cookies.add(policy.expired(ACCESS_TOKEN_COOKIE));
    cookies.add(policy.expired(REFRESH_TOKEN_COOKIE));
}

pub fn read_code_verifier(cookies: &Cookies) -> Option<String> {
    cookies
        .get(CODE_VERIFIER_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn write_code_verifier(cookies: &Cookies, policy: CookiePolicy, verifier: &str) {
    cookies.add(policy.build(
        CODE_VERIFIER_COOKIE,
        verifier.to_string(),
        Duration::seconds(CODE_VERIFIER_TTL_SECS),
    ));
}

pub fn clear_code_verifier(cookies: &Cookies, policy: CookiePolicy) {
    cookies.add(policy.expired(CODE_VERIFIER_COOKIE));
}
