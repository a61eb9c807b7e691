use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use commuter_shared::errors::{AppError, AppResult, ErrorCode};
use commuter_shared::types::{ApiErrorResponse, ApiResponse, Empty};
use commuter_shared::{ApiJson, BackendError, SessionScope};

use crate::models::{non_blank, validate_row_id, NewReport, ReportLikes, RowId};
use crate::routes::validate_body;
use crate::services::report_service;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadReportRequest {
    #[validate(required, custom = "non_blank")]
    pub address: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub location: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub description: Option<String>,
    #[validate(required, custom = "non_blank")]
    pub duration: Option<String>,
    pub is_published: Option<bool>,
}

impl UploadReportRequest {
    fn into_row(self) -> NewReport {
        NewReport {
            address: self.address.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            is_published: self.is_published,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportIdRequest {
    /// Report id, numeric or text.
    #[validate(required, custom = "validate_row_id")]
    #[schema(value_type = Option<Object>)]
    pub id: Option<RowId>,
}

impl ReportIdRequest {
    fn validated(self) -> AppResult<RowId> {
        validate_body(&self, "Report ID is required")?;
        self.id.ok_or_else(|| AppError::new(ErrorCode::ValidationError, "Report ID is required"))
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: Value,
}

/// Lookup failures: a backend rejection (no such row, bad id) is a 404 with
/// `message`, anything else is a 500.
fn lookup_error(code: ErrorCode, message: &str, err: BackendError) -> AppError {
    if err.is_client_rejection() {
        AppError::with_error(code, message, err.to_string())
    } else {
        AppError::with_error(ErrorCode::InternalError, "Internal server error", err.to_string())
    }
}

#[utoipa::path(
    post,
    path = "/api/upload_report",
    tag = "Reports",
    request_body = UploadReportRequest,
    responses(
        (status = 200, description = "Report uploaded successfully"),
        (status = 400, description = "All fields are required", body = ApiErrorResponse),
        (status = 500, description = "Failed to upload report", body = ApiErrorResponse),
    )
)]
pub async fn upload_report(
    scope: SessionScope,
    ApiJson(req): ApiJson<UploadReportRequest>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    validate_body(&req, "All fields are required")?;
    let row = req.into_row();

    let bearer = scope.bearer();
    report_service::insert_report(scope.backend(), bearer.as_deref(), &row)
        .await
        .map_err(|e| AppError::with_error(ErrorCode::InternalError, "Failed to upload report", e.to_string()))?;

    tracing::info!(address = %row.address, "report uploaded");
    Ok(Json(ApiResponse::message("Report uploaded successfully")))
}

#[utoipa::path(
    post,
    path = "/api/get_report",
    tag = "Reports",
    request_body = ReportIdRequest,
    responses(
        (status = 200, description = "The stored report row, as `report`"),
        (status = 400, description = "Report ID is required", body = ApiErrorResponse),
        (status = 404, description = "Report not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    )
)]
pub async fn get_report(
    scope: SessionScope,
    ApiJson(req): ApiJson<ReportIdRequest>,
) -> AppResult<Json<ApiResponse<ReportResponse>>> {
    let id = req.validated()?;

    let bearer = scope.bearer();
    let report = report_service::fetch_report(scope.backend(), bearer.as_deref(), &id)
        .await
        .map_err(|e| lookup_error(ErrorCode::ReportNotFound, "Report not found", e))?;

    Ok(Json(ApiResponse::ok(ReportResponse { report })))
}

#[utoipa::path(
    post,
    path = "/api/report_likes",
    tag = "Reports",
    request_body = ReportIdRequest,
    responses(
        (status = 200, description = "`likes`, `dislikes` and `user_liked` for the report"),
        (status = 400, description = "Report ID is required", body = ApiErrorResponse),
        (status = 404, description = "Likes data not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    )
)]
pub async fn report_likes(
    scope: SessionScope,
    ApiJson(req): ApiJson<ReportIdRequest>,
) -> AppResult<Json<ApiResponse<ReportLikes>>> {
    let id = req.validated()?;

    let bearer = scope.bearer();
    let likes = report_service::fetch_likes(scope.backend(), bearer.as_deref(), &id)
        .await
        .map_err(|e| lookup_error(ErrorCode::LikesNotFound, "Likes data not found", e))?;

    Ok(Json(ApiResponse::ok(likes)))
}
