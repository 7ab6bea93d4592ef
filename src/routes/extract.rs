use axum::extract::FromRequest;

use crate::error::Error;

/// `axum::Json` whose rejections (bad syntax, wrong types, missing
/// content type) answer 400 with the usual `{"error": ...}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
