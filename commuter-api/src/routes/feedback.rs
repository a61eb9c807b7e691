use axum::Json;
use serde::Deserialize;
use serde_json::Number;
use utoipa::ToSchema;
use validator::Validate;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Empty};
use commuter_shared::{ApiJson, SessionScope};

use crate::models::{non_blank, NewFeedback};
use crate::routes::validate_body;
use crate::services::report_service;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(required, custom = "non_blank")]
    pub report_type: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub comments: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub severity: Option<String>,
    /// Any number, including zero and fractions.
    #[validate(required)]
    #[schema(value_type = Option<f64>)]
    pub stars: Option<Number>,
    #[validate(required)]
    pub contact: Option<bool>,
}

impl FeedbackRequest {
    fn into_row(self) -> NewFeedback {
        NewFeedback {
            report_type: self.report_type.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
            severity: self.severity.unwrap_or_default(),
            stars: self.stars.unwrap_or_else(|| Number::from(0)),
            contact: self.contact.unwrap_or_default(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "Reports",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback submitted successfully"),
        (status = 400, description = "All fields are required", body = ApiErrorResponse),
        (status = 500, description = "Failed to submit feedback", body = ApiErrorResponse),
    )
)]
pub async fn submit_feedback(
    scope: SessionScope,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    validate_body(&req, "All fields are required")?;
    let row = req.into_row();

    let bearer = scope.bearer();
    report_service::insert_feedback(scope.backend(), bearer.as_deref(), &row)
        .await
        .map_err(|e| AppError::with_error(ErrorCode::InternalError, "Failed to submit feedback", e.to_string()))?;

    tracing::info!(report_type = %row.report_type, stars = %row.stars, "feedback submitted");
    Ok(Json(ApiResponse::message("Feedback submitted successfully")))
}
