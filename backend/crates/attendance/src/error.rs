//! Attendance Error Types
//!
//! This module provides attendance-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::MissingField;

/// Attendance-specific result type alias
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Attendance-specific error variants
///
/// Every variant has its own stable [`code`](AttendanceError::code), so callers
/// never have to inspect the message to tell two failures apart.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Required field missing or empty
    #[error("Missing student information: {0}")]
    InvalidInput(String),

    /// Token id unknown, malformed, or absent on a QR check-in
    #[error("Invalid QR code.")]
    InvalidToken,

    /// Token existed but its validity window has passed
    #[error("QR code has expired.")]
    TokenExpired,

    /// Student already has a record for the day
    #[error("Student already marked present today.")]
    DuplicateCheckIn,

    /// Client already used its scan for the current window
    #[error("Scan limit reached, next scan allowed at {next_allowed_at}")]
    RateLimited {
        next_allowed_at: DateTime<Utc>,
        /// Whole seconds from the denial until `next_allowed_at`, rounded up
        retry_after_secs: i64,
    },

    /// Reference data not found
    #[error("{0} not found")]
    NotFound(String),

    /// Nothing recorded for the requested day
    #[error("No attendance data to export.")]
    NoAttendanceData,

    /// Reference data file could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Reference data file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Workbook could not be produced
    #[error("Export error: {0}")]
    Export(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AttendanceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttendanceError::InvalidInput(_) => ErrorKind::BadRequest,
            AttendanceError::InvalidToken | AttendanceError::TokenExpired => ErrorKind::Forbidden,
            AttendanceError::DuplicateCheckIn => ErrorKind::Conflict,
            AttendanceError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AttendanceError::NotFound(_) | AttendanceError::NoAttendanceData => {
                ErrorKind::NotFound
            }
            AttendanceError::Storage(_)
            | AttendanceError::Serialization(_)
            | AttendanceError::Export(_)
            | AttendanceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceError::InvalidInput(_) => "INVALID_INPUT",
            AttendanceError::InvalidToken => "INVALID_TOKEN",
            AttendanceError::TokenExpired => "TOKEN_EXPIRED",
            AttendanceError::DuplicateCheckIn => "DUPLICATE_CHECK_IN",
            AttendanceError::RateLimited { .. } => "RATE_LIMITED",
            AttendanceError::NotFound(_) => "NOT_FOUND",
            AttendanceError::NoAttendanceData => "NO_ATTENDANCE_DATA",
            AttendanceError::Storage(_) => "STORAGE_ERROR",
            AttendanceError::Serialization(_) => "SERIALIZATION_ERROR",
            AttendanceError::Export(_) => "EXPORT_ERROR",
            AttendanceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string()).with_code(self.code());
        match self {
            AttendanceError::RateLimited {
                next_allowed_at, ..
            } => err.with_action(format!(
                "Try again after {}",
                next_allowed_at.to_rfc3339()
            )),
            AttendanceError::TokenExpired => err.with_action("Scan the current QR code"),
            _ => err,
        }
    }

    pub fn retry_after_secs(&self) -> Option<i64> {
        match self {
            AttendanceError::RateLimited {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AttendanceError::Storage(e) => {
                tracing::error!(error = %e, "Attendance storage error");
            }
            AttendanceError::Serialization(e) => {
                tracing::error!(error = %e, "Attendance serialization error");
            }
            AttendanceError::Export(msg) | AttendanceError::Internal(msg) => {
                tracing::error!(message = %msg, "Attendance internal error");
            }
            AttendanceError::RateLimited {
                next_allowed_at,
                retry_after_secs,
            } => {
                tracing::warn!(
                    next_allowed_at = %next_allowed_at,
                    retry_after_secs,
                    "Scan rate limit exceeded"
                );
            }
            AttendanceError::TokenExpired => {
                tracing::warn!("Check-in with expired token");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Attendance error");
            }
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        err.to_app_error()
    }
}

impl From<MissingField> for AttendanceError {
    fn from(err: MissingField) -> Self {
        AttendanceError::InvalidInput(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AttendanceError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AttendanceError::Export(err.to_string())
    }
}

impl From<platform::rate_limit::RateLimitDenied> for AttendanceError {
    fn from(denied: platform::rate_limit::RateLimitDenied) -> Self {
        let millis = denied.retry_after.num_milliseconds();
        AttendanceError::RateLimited {
            next_allowed_at: denied.next_allowed_at,
            retry_after_secs: ((millis + 999) / 1000).max(0),
        }
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = self.retry_after_secs();
        let mut response = self.to_app_error().into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
