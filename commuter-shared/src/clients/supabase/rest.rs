use serde_json::Value;

use super::{check, SupabaseClient};
use crate::backend::{BackendError, BackendResult, Filter, TableQuery};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_MINIMAL: &str = "return=minimal";

impl SupabaseClient {
    pub async fn select_single(&self, bearer: Option<&str>, query: &TableQuery) -> BackendResult<Value> {
        let req = self
            .http
            .get(self.rest_endpoint(&query.table))
            .query(&[("select", query.columns.as_str())])
            .query(&query.filter.to_query_pairs())
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT);

        let response = check(self.authorize(req, bearer).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn select_maybe_single(
        &self,
        bearer: Option<&str>,
        query: &TableQuery,
    ) -> BackendResult<Option<Value>> {
        let req = self
            .http
            .get(self.rest_endpoint(&query.table))
            .query(&[("select", query.columns.as_str()), ("limit", "2")])
            .query(&query.filter.to_query_pairs());

        let response = check(self.authorize(req, bearer).send().await?).await?;
        let mut rows: Vec<Value> = response.json().await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(BackendError::no_single_row(n)),
        }
    }

    pub async fn insert(&self, bearer: Option<&str>, table: &str, row: Value) -> BackendResult<()> {
        let req = self
            .http
            .post(self.rest_endpoint(table))
            .header("Prefer", RETURN_MINIMAL)
            .json(&row);

        check(self.authorize(req, bearer).send().await?).await?;
        tracing::debug!(table, "row inserted");
        Ok(())
    }

    pub async fn update(
        &self,
        bearer: Option<&str>,
        table: &str,
        filter: &Filter,
        patch: Value,
    ) -> BackendResult<()> {
        let req = self
            .http
            .patch(self.rest_endpoint(table))
            .query(&filter.to_query_pairs())
            .header("Prefer", RETURN_MINIMAL)
            .json(&patch);

        check(self.authorize(req, bearer).send().await?).await?;
        tracing::debug!(table, "rows updated");
        Ok(())
    }
}
