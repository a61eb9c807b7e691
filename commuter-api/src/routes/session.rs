use commuter_shared::{SessionCheck, SessionScope};

/// Reports whether the caller's cookies hold an active session. The status
/// code mirrors the body's `status`.
#[utoipa::path(
    get,
    path = "/api/auth/check-session",
    tag = "Session",
    responses(
        (status = 200, description = "Session active", body = SessionCheck),
        (status = 401, description = "Session not active", body = SessionCheck),
        (status = 500, description = "Error checking session", body = SessionCheck),
    )
)]
pub async fn check_session(scope: SessionScope) -> SessionCheck {
    scope.check_session().await
}
