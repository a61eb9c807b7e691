use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;
use validator::ValidationError;

// --- Profile ---

/// Onboarding answers written to a `profile` row. Fields left out of the
/// request are left out of the update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_modes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commute_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboard: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileOnboard {
    #[serde(default)]
    pub onboard: Option<bool>,
}

// --- Feedback ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedback {
    pub report_type: String,
    pub comments: String,
    pub severity: String,
    pub stars: Number,
    pub contact: bool,
}

// --- Reports ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub address: String,
    pub location: String,
    pub description: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLikes {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub likes: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub dislikes: i64,
    #[serde(default)]
    pub user_liked: Value,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Primary key as sent by clients: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Zero and the empty string do not identify a row.
    pub fn is_present(&self) -> bool {
        match self {
            RowId::Int(n) => *n != 0,
            RowId::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Text(s) => f.write_str(s.trim()),
        }
    }
}

// --- Validators ---

pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validate_row_id(id: &RowId) -> Result<(), ValidationError> {
    if !id.is_present() {
        return Err(ValidationError::new("missing_id"));
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
