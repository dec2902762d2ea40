//! Application Error - Unified error type for the HTTP boundary
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified error carried to the HTTP boundary.
///
/// ## Fields
/// * `kind` - classification, mapped to the HTTP status
/// * `code` - stable machine-readable code; distinguishes failures that share a status
/// * `message` - human-readable message
/// * `action` - what the caller should do next (optional)
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Forbidden, "QR code has expired.")
///     .with_code("TOKEN_EXPIRED")
///     .with_action("Scan the current QR code");
/// assert_eq!(err.status_code(), 403);
/// assert_eq!(err.code(), Some("TOKEN_EXPIRED"));
/// ```
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    code: Option<Cow<'static, str>>,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            action: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Attach a stable machine-readable code (e.g. `"DUPLICATE_CHECK_IN"`)
    #[inline]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the action the caller should take
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::Conflict, "Student already marked present today.");
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "Student already marked present today.");
        assert!(err.action().is_none());
        assert!(err.code().is_none());
    }

    #[test]
    fn test_codes_distinguish_same_status() {
        let invalid =
            AppError::new(ErrorKind::Forbidden, "Invalid QR code.").with_code("INVALID_TOKEN");
        let expired =
            AppError::new(ErrorKind::Forbidden, "QR code has expired.").with_code("TOKEN_EXPIRED");
        assert_eq!(invalid.status_code(), expired.status_code());
        assert_ne!(invalid.code(), expired.code());
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::NotFound, "No attendance data to export.");
        assert_eq!(err.to_string(), "[Not Found] No attendance data to export.");

        let err_with_action = AppError::new(ErrorKind::TooManyRequests, "Scan limit reached")
            .with_action("Try again at 12:30:00");
        assert!(err_with_action.to_string().contains("Action:"));
    }
}
