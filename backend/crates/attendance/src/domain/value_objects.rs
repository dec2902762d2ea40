//! Domain Value Objects
//!
//! Validated inputs of a check-in request. Construction trims surrounding
//! whitespace and rejects values that are empty afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A required check-in field was absent or blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} is required")]
pub struct MissingField {
    pub field: &'static str,
}

fn required(field: &'static str, input: &str) -> Result<String, MissingField> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

// ============================================================================
// StudentId
// ============================================================================

/// Caller-supplied student identifier; the identity key within a ledger day
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    pub fn new(input: impl AsRef<str>) -> Result<Self, MissingField> {
        required("studentId", input.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = MissingField;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// StudentName
// ============================================================================

/// Display name; never used for identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, MissingField> {
        required("studentName", input.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentName {
    type Error = MissingField;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentName> for String {
    fn from(name: StudentName) -> Self {
        name.0
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// CheckInMethod
// ============================================================================

/// How a check-in was performed
///
/// The set is open: only the exact string `"qr"` triggers token validation,
/// `"manual"` is named for convenience and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CheckInMethod {
    Qr,
    Manual,
    Other(String),
}

impl CheckInMethod {
    /// Blank input is rejected; anything else is matched and kept untrimmed.
    pub fn new(input: impl AsRef<str>) -> Result<Self, MissingField> {
        let raw = input.as_ref();
        required("method", raw)?;
        Ok(match raw {
            "qr" => Self::Qr,
            "manual" => Self::Manual,
            _ => Self::Other(raw.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Qr => "qr",
            Self::Manual => "manual",
            Self::Other(method) => method,
        }
    }

    pub fn requires_token(&self) -> bool {
        matches!(self, Self::Qr)
    }
}

impl TryFrom<String> for CheckInMethod {
    type Error = MissingField;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CheckInMethod> for String {
    fn from(method: CheckInMethod) -> Self {
        match method {
            CheckInMethod::Other(method) => method,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CheckInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_trims() {
        let id = StudentId::new("  S1 ").unwrap();
        assert_eq!(id.as_str(), "S1");
        assert_eq!(id, StudentId::new("S1").unwrap());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(
            StudentId::new("   ").unwrap_err(),
            MissingField { field: "studentId" }
        );
        assert_eq!(
            StudentName::new("").unwrap_err(),
            MissingField { field: "studentName" }
        );
        assert_eq!(
            CheckInMethod::new("").unwrap_err(),
            MissingField { field: "method" }
        );
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(CheckInMethod::new("qr").unwrap(), CheckInMethod::Qr);
        assert_eq!(CheckInMethod::new("manual").unwrap(), CheckInMethod::Manual);
        // Case-sensitive: only the exact lowercase value is a QR check-in
        let upper = CheckInMethod::new("QR").unwrap();
        assert_eq!(upper, CheckInMethod::Other("QR".to_string()));
        assert!(!upper.requires_token());
        assert!(CheckInMethod::Qr.requires_token());
    }

    #[test]
    fn test_padded_method_is_not_qr() {
        let padded = CheckInMethod::new(" qr ").unwrap();
        assert_eq!(padded, CheckInMethod::Other(" qr ".to_string()));
        assert_eq!(padded.as_str(), " qr ");
        assert!(!padded.requires_token());
    }

    #[test]
    fn test_serde_as_plain_strings() {
        let json = serde_json::to_string(&CheckInMethod::Other("nfc".into())).unwrap();
        assert_eq!(json, r#""nfc""#);

        let method: CheckInMethod = serde_json::from_str(r#""qr""#).unwrap();
        assert_eq!(method, CheckInMethod::Qr);

        assert!(serde_json::from_str::<StudentId>(r#""""#).is_err());
    }
}
