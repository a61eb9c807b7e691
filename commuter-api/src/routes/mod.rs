pub mod entry;
pub mod feedback;
pub mod health;
pub mod login;
pub mod logout;
pub mod oauth;
pub mod refresh;
pub mod reports;
pub mod session;
pub mod signup;
pub mod user;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

use commuter_shared::middleware::{cors_middleware, metrics_middleware, CorsPolicy};
use commuter_shared::{AppError, AppResult, ErrorCode};

use crate::docs::ApiDoc;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = Arc::new(CorsPolicy::new(state.config.allowed_origins.iter().cloned()));

    let api = Router::new()
        .route("/auth/authorize", get(oauth::authorize))
        .route("/auth/callback", get(oauth::callback))
        .route("/auth/check-session", get(session::check_session))
        .route("/auth/refresh", post(refresh::refresh))
        .route("/auth/logout", post(logout::logout))
        .route("/login", post(login::login))
        .route("/signup", post(signup::signup))
        .route("/get-user", get(user::get_user))
        .route("/entry", post(entry::update_entry))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/upload_report", post(reports::upload_report))
        .route("/get_report", post(reports::get_report))
        .route("/report_likes", post(reports::report_likes))
        .layer(middleware::from_fn_with_state(cors, cors_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the request's validators; any failure becomes a 400 with `message`.
pub(crate) fn validate_body<T: Validate>(req: &T, message: &str) -> AppResult<()> {
    req.validate().map_err(|errors| {
        tracing::debug!(errors = %errors, "request body rejected");
        AppError::new(ErrorCode::ValidationError, message)
    })
}
