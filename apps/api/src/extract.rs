//! Request extractors whose rejections use the API's error body.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` with malformed bodies reported as `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
