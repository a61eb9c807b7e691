use commuter_shared::{Backend, BackendError, BackendResult, Filter, TableQuery};

use crate::models::{ProfileOnboard, UserInfo};
use crate::schema::profile;

/// Whether any profile row already carries `email`.
pub async fn email_exists(backend: &dyn Backend, bearer: Option<&str>, email: &str) -> BackendResult<bool> {
    let query = TableQuery::new(profile::TABLE)
        .columns(profile::EMAIL)
        .eq(profile::EMAIL, email);

    match backend.select_maybe_single(bearer, &query).await {
        Ok(row) => Ok(row.is_some()),
        // Several rows for one email: still taken.
        Err(err) if err.is_no_single_row() => Ok(true),
        Err(err) => Err(err),
    }
}

/// The profile's onboarding flag. The row must exist.
pub async fn onboard_flag(backend: &dyn Backend, bearer: Option<&str>, email: &str) -> BackendResult<Option<bool>> {
    let query = TableQuery::new(profile::TABLE)
        .columns(profile::ONBOARD)
        .eq(profile::EMAIL, email);

    let row = backend.select_single(bearer, &query).await?;
    let parsed: ProfileOnboard =
        serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(parsed.onboard)
}

pub async fn update_user_info(
    backend: &dyn Backend,
    bearer: Option<&str>,
    email: &str,
    info: &UserInfo,
) -> BackendResult<()> {
    let patch = serde_json::to_value(info).map_err(|e| BackendError::Decode(e.to_string()))?;
    backend
        .update(bearer, profile::TABLE, &Filter::new().eq(profile::EMAIL, email), patch)
        .await
}
