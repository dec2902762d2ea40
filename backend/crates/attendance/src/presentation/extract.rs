//! Request extractors

use crate::error::AttendanceError;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

/// `axum::Json` whose rejections render as `INVALID_INPUT` errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AttendanceError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AttendanceError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        AttendanceError::InvalidInput(rejection.body_text())
    }
}
