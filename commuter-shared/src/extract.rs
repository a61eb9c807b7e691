use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections render through [`AppError`], so a malformed
/// body answers with the usual JSON error envelope and a 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
