//! Common test utilities for API integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum_test::TestServer;
use commuter_api::config::AppConfig;
use commuter_api::{create_router, AppState};
use commuter_shared::{
    AuthResponse, Backend, BackendError, BackendResult, Filter, Session, SessionTokens,
    SignUpParams, TableQuery, User,
};
use serde_json::{json, Value};
use uuid::Uuid;

pub const SITE_URL: &str = "http://localhost:3000";

/// How the mock answers session lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookup {
    #[default]
    Normal,
    /// Tokens are accepted at issuance but the backend reports no session.
    Inactive,
    /// The backend cannot be reached.
    Unreachable,
}

#[derive(Default)]
struct MockState {
    accounts: HashMap<String, (String, User)>,
    sessions: HashMap<String, Session>,
    refresh_tokens: HashMap<String, User>,
    codes: HashMap<String, String>,
    tables: HashMap<String, Vec<Value>>,
    issued: usize,
    lookup: Lookup,
    exchange_unreachable: bool,
    profile_lookup_fails: bool,
    inserts_fail: bool,
}

/// In-memory stand-in for the Supabase project. Records every call.
#[derive(Default)]
pub struct MockBackend {
    state: RwLock<MockState>,
    calls: RwLock<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed account plus its profile row.
    pub fn add_account(&self, email: &str, password: &str, onboard: bool) -> User {
        let user = User::new(Uuid::new_v4(), email);
        let mut state = self.state.write().unwrap();
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        state
            .tables
            .entry("profile".to_string())
            .or_default()
            .push(json!({ "email": email, "onboard": onboard }));
        user
    }

    /// Session for an existing account, as if issued earlier.
    pub fn issue_session_for(&self, email: &str) -> Session {
        let mut state = self.state.write().unwrap();
        let user = state.accounts[email].1.clone();
        issue(&mut state, user)
    }

    pub fn add_code(&self, code: &str, email: &str) {
        self.state
            .write()
            .unwrap()
            .codes
            .insert(code.to_string(), email.to_string());
    }

    pub fn add_row(&self, table: &str, row: Value) {
        self.state
            .write()
            .unwrap()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .read()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_lookup(&self, lookup: Lookup) {
        self.state.write().unwrap().lookup = lookup;
    }

    pub fn make_exchange_unreachable(&self) {
        self.state.write().unwrap().exchange_unreachable = true;
    }

    pub fn fail_profile_lookups(&self) {
        self.state.write().unwrap().profile_lookup_fails = true;
    }

    pub fn fail_inserts(&self) {
        self.state.write().unwrap().inserts_fail = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn last_call(&self, prefix: &str) -> Option<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.starts_with(prefix))
            .cloned()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.write().unwrap().push(call.into());
    }
}

fn issue(state: &mut MockState, user: User) -> Session {
    state.issued += 1;
    let mut session = Session::new(
        format!("access-{}", state.issued),
        format!("refresh-{}", state.issued),
        user.clone(),
    );
    session.expires_in = Some(3600);
    state.sessions.insert(session.access_token.clone(), session.clone());
    state.refresh_tokens.insert(session.refresh_token.clone(), user);
    session
}

fn unreachable() -> BackendError {
    BackendError::Transport("error sending request: connection refused".to_string())
}

fn single(rows: Vec<Value>) -> BackendResult<Value> {
    match <[Value; 1]>::try_from(rows) {
        Ok([row]) => Ok(row),
        Err(rows) => Err(BackendError::no_single_row(rows.len())),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn sign_up(&self, params: SignUpParams<'_>) -> BackendResult<AuthResponse> {
        self.record(format!("sign_up:{}", params.email));
        let mut state = self.state.write().unwrap();
        if state.accounts.contains_key(params.email) {
            return Err(BackendError::api(422, Some("user_already_exists"), "User already registered"));
        }
        if params.password.len() < 6 {
            return Err(BackendError::api(
                422,
                Some("weak_password"),
                "Password should be at least 6 characters.",
            ));
        }

        let mut user = User::new(Uuid::new_v4(), params.email);
        if let Some(name) = params.name {
            user.extra.insert("user_metadata".into(), json!({ "name": name }));
        }
        state
            .accounts
            .insert(params.email.to_string(), (params.password.to_string(), user.clone()));

        Ok(AuthResponse {
            user: Some(user),
            session: None,
        })
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<AuthResponse> {
        self.record(format!("sign_in:{email}"));
        let mut state = self.state.write().unwrap();
        if state.lookup == Lookup::Unreachable {
            return Err(unreachable());
        }

        let user = match state.accounts.get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => {
                return Err(BackendError::api(
                    400,
                    Some("invalid_credentials"),
                    "Invalid login credentials",
                ))
            }
        };

        let session = issue(&mut state, user.clone());
        Ok(AuthResponse {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> BackendResult<Session> {
        self.record(format!("exchange:{code}:{}", code_verifier.unwrap_or("-")));
        let mut state = self.state.write().unwrap();
        if state.exchange_unreachable {
            return Err(unreachable());
        }

        let email = state.codes.remove(code).ok_or_else(|| {
            BackendError::api(404, Some("flow_state_not_found"), "invalid flow state, no valid flow state found")
        })?;
        let user = state.accounts[&email].1.clone();
        Ok(issue(&mut state, user))
    }

    async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<Session>> {
        self.record("get_session");
        let mut state = self.state.write().unwrap();
        match state.lookup {
            Lookup::Inactive => return Ok(None),
            Lookup::Unreachable => return Err(unreachable()),
            Lookup::Normal => {}
        }

        if let Some(session) = tokens
            .access_token
            .as_ref()
            .and_then(|t| state.sessions.get(t))
        {
            return Ok(Some(session.clone()));
        }
        if let Some(user) = tokens
            .refresh_token
            .as_ref()
            .and_then(|t| state.refresh_tokens.remove(t))
        {
            return Ok(Some(issue(&mut state, user)));
        }
        if tokens.access_token.is_some() {
            return Err(BackendError::api(401, Some("bad_jwt"), "invalid JWT: token is expired"));
        }
        Ok(None)
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        self.record("refresh");
        let mut state = self.state.write().unwrap();
        if state.lookup == Lookup::Unreachable {
            return Err(unreachable());
        }

        let user = state.refresh_tokens.remove(refresh_token).ok_or_else(|| {
            BackendError::api(
                400,
                Some("refresh_token_not_found"),
                "Invalid Refresh Token: Refresh Token Not Found",
            )
        })?;
        Ok(issue(&mut state, user))
    }

    async fn get_user(&self, access_token: &str) -> BackendResult<User> {
        self.record("get_user");
        let state = self.state.read().unwrap();
        state
            .sessions
            .get(access_token)
            .map(|s| s.user.clone())
            .ok_or_else(|| BackendError::api(401, Some("bad_jwt"), "invalid JWT"))
    }

    async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        self.record("sign_out");
        let mut state = self.state.write().unwrap();
        match state.sessions.remove(access_token) {
            Some(session) => {
                state.refresh_tokens.remove(&session.refresh_token);
                Ok(())
            }
            None => Err(BackendError::api(401, Some("bad_jwt"), "invalid JWT")),
        }
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> String {
        format!(
            "https://backend.test/auth/v1/authorize?provider={provider}&redirect_to={redirect_to}&code_challenge={code_challenge}&code_challenge_method=s256"
        )
    }

    async fn select_single(&self, bearer: Option<&str>, query: &TableQuery) -> BackendResult<Value> {
        self.record(format!("select:{}:{}", query.table, bearer.unwrap_or("anon")));
        let state = self.state.read().unwrap();
        if state.profile_lookup_fails && query.table == "profile" {
            return Err(unreachable());
        }
        single(matching(&state, &query.table, &query.filter))
    }

    async fn select_maybe_single(
        &self,
        bearer: Option<&str>,
        query: &TableQuery,
    ) -> BackendResult<Option<Value>> {
        self.record(format!("select:{}:{}", query.table, bearer.unwrap_or("anon")));
        let state = self.state.read().unwrap();
        if state.profile_lookup_fails && query.table == "profile" {
            return Err(unreachable());
        }
        let rows = matching(&state, &query.table, &query.filter);
        if rows.is_empty() {
            return Ok(None);
        }
        single(rows).map(Some)
    }

    async fn insert(&self, bearer: Option<&str>, table: &str, row: Value) -> BackendResult<()> {
        self.record(format!("insert:{table}:{}", bearer.unwrap_or("anon")));
        let mut state = self.state.write().unwrap();
        if state.inserts_fail {
            return Err(BackendError::api(
                400,
                Some("23502"),
                "null value in column \"comments\" violates not-null constraint",
            ));
        }
        state.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update(
        &self,
        bearer: Option<&str>,
        table: &str,
        filter: &Filter,
        patch: Value,
    ) -> BackendResult<()> {
        self.record(format!("update:{table}:{}", bearer.unwrap_or("anon")));
        let mut state = self.state.write().unwrap();
        if state.inserts_fail {
            return Err(BackendError::api(400, Some("22P02"), "invalid input syntax for type date"));
        }
        let Value::Object(changes) = patch else {
            return Ok(());
        };
        for row in state.tables.entry(table.to_string()).or_default() {
            if filter.matches(row) {
                if let Value::Object(fields) = row {
                    fields.extend(changes.clone());
                }
            }
        }
        Ok(())
    }
}

fn matching(state: &MockState, table: &str, filter: &Filter) -> Vec<Value> {
    state
        .tables
        .get(table)
        .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
        .unwrap_or_default()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        supabase_url: "https://backend.test".to_string(),
        supabase_anon_key: "anon".to_string(),
        site_url: SITE_URL.to_string(),
        ..AppConfig::default()
    }
}

/// Create a test server backed by a fresh mock backend
pub fn create_test_server() -> (TestServer, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());

    let state = Arc::new(AppState {
        config: test_config(),
        backend: backend.clone(),
        metrics_handle: None,
    });

    let app = create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, backend)
}

pub fn access_cookie(session: &Session) -> cookie::Cookie<'static> {
    cookie::Cookie::new("sb-access-token", session.access_token.clone())
}

pub fn refresh_cookie(session: &Session) -> cookie::Cookie<'static> {
    cookie::Cookie::new("sb-refresh-token", session.refresh_token.clone())
}
