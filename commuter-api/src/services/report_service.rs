use serde_json::Value;

use commuter_shared::{Backend, BackendError, BackendResult, TableQuery};

use crate::models::{NewFeedback, NewReport, ReportLikes, RowId};
use crate::schema::{feedback, report_likes, reports};

pub async fn insert_report(backend: &dyn Backend, bearer: Option<&str>, report: &NewReport) -> BackendResult<()> {
    let row = serde_json::to_value(report).map_err(|e| BackendError::Decode(e.to_string()))?;
    backend.insert(bearer, reports::TABLE, row).await
}

/// The whole report row, passed through as stored.
pub async fn fetch_report(backend: &dyn Backend, bearer: Option<&str>, id: &RowId) -> BackendResult<Value> {
    let query = TableQuery::new(reports::TABLE).eq(reports::ID, id);
    backend.select_single(bearer, &query).await
}

pub async fn fetch_likes(backend: &dyn Backend, bearer: Option<&str>, id: &RowId) -> BackendResult<ReportLikes> {
    let query = TableQuery::new(report_likes::TABLE)
        .columns(report_likes::COUNTERS)
        .eq(report_likes::REPORT_ID, id);

    let row = backend.select_single(bearer, &query).await?;
    serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Every call inserts a new row; identical submissions are not merged.
pub async fn insert_feedback(backend: &dyn Backend, bearer: Option<&str>, entry: &NewFeedback) -> BackendResult<()> {
    let row = serde_json::to_value(entry).map_err(|e| BackendError::Decode(e.to_string()))?;
    backend.insert(bearer, feedback::TABLE, row).await
}
