use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope. Route specific fields are flattened next to `status`
/// and `message`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: None,
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: Some(message.into()),
            data,
        }
    }
}

/// Payload for responses that only carry a message.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok_with_message(Empty {}, message)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Report {
        report: serde_json::Value,
    }

    #[test]
    fn flattens_route_fields_next_to_status() {
        let body = ApiResponse::ok(Report { report: json!({ "id": 7 }) });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "status": 200, "report": { "id": 7 } }));
    }

    #[test]
    fn message_only_response() {
        let value = serde_json::to_value(ApiResponse::message("Feedback submitted successfully")).unwrap();
        assert_eq!(value, json!({ "status": 200, "message": "Feedback submitted successfully" }));
    }

    #[test]
    fn error_body_omits_missing_cause() {
        let value = serde_json::to_value(ApiErrorResponse::new(StatusCode::BAD_REQUEST, "Report ID is required")).unwrap();
        assert_eq!(value, json!({ "status": 400, "message": "Report ID is required" }));
    }
}
