//! Domain Entities
//!
//! Core business entities for the attendance domain.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use kernel::id::{ClassId, TimetableId, TokenId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CheckInMethod, StudentId, StudentName};

/// Descriptive fields carried by a token. Display and export only; never
/// consulted when validating a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub class_name: String,
    pub classroom: String,
    pub instructor: String,
    pub subject: String,
    pub time_slot: String,
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timetable_id: Option<TimetableId>,
}

/// SessionToken entity - one class session's QR credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub id: TokenId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: TokenMetadata,
}

impl SessionToken {
    /// Create a new token valid from `now` for `ttl`
    pub fn new(metadata: TokenMetadata, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            id: TokenId::new(),
            issued_at: now,
            expires_at: now + ttl,
            metadata,
        }
    }

    /// Valid up to and including `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Only presence is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    Present,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
        }
    }
}

/// AttendanceRecord entity - one student's presence on one day
///
/// Immutable once written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub day: NaiveDate,
    pub student_id: StudentId,
    pub student_name: StudentName,
    /// Local wall-clock time, `HH:MM:SS`
    pub check_in_time: String,
    pub checked_in_at: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub method: CheckInMethod,
    /// Token presented on a QR check-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,
}

/// Class reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: ClassId,
    pub name: String,
    pub room: String,
    pub instructor: String,
    pub subject: String,
}

/// Timetable slot reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: TimetableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    pub class_name: String,
    pub subject: String,
    pub instructor: String,
    pub room: String,
    /// Weekday label, e.g. "Monday"
    pub day: String,
    /// e.g. "09:00-10:30"
    pub time_slot: String,
}
