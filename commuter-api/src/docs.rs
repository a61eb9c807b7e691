//! OpenAPI document for the service, served with Swagger UI at `/api/docs`.

use utoipa::OpenApi;

use commuter_shared::types::{ApiErrorResponse, HealthResponse, HealthStatus};
use commuter_shared::SessionCheck;

use crate::models::UserInfo;
use crate::routes::{entry, feedback, health, login, logout, oauth, refresh, reports, session, signup, user};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commuter API",
        description = "Sign up, sign in and session management over Supabase, plus commuter profiles, feedback and incident reports.",
    ),
    paths(
        oauth::authorize,
        oauth::callback,
        session::check_session,
        refresh::refresh,
        logout::logout,
        login::login,
        signup::signup,
        user::get_user,
        entry::update_entry,
        feedback::submit_feedback,
        reports::upload_report,
        reports::get_report,
        reports::report_likes,
        health::health_check,
    ),
    components(
        schemas(
            login::LoginRequest,
            signup::SignupRequest,
            entry::EntryRequest,
            UserInfo,
            feedback::FeedbackRequest,
            reports::UploadReportRequest,
            reports::ReportIdRequest,
            refresh::RefreshResponse,
            SessionCheck,
            ApiErrorResponse,
            HealthResponse,
            HealthStatus,
        )
    ),
    tags(
        (name = "Auth", description = "Sign up, password and OAuth sign in"),
        (name = "Session", description = "Cookie backed session checks, refresh and logout"),
        (name = "Profile", description = "Onboarding answers"),
        (name = "Reports", description = "Incident reports, likes and feedback"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;
