//! API DTOs (Data Transfer Objects)

use crate::application::{IssueTokenInput, NewClass, NewTimetable, ScanQuotaOutput};
use crate::domain::entities::{AttendanceRecord, SessionToken};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ClassId, TimetableId};
use serde::{Deserialize, Serialize};

/// Request for POST /api/generate_qr
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateQrRequest {
    pub class_name: Option<String>,
    pub classroom: Option<String>,
    pub instructor: Option<String>,
    pub subject: Option<String>,
    pub time_slot: Option<String>,
    pub day: Option<String>,
    pub timetable_id: Option<TimetableId>,
}

impl From<GenerateQrRequest> for IssueTokenInput {
    fn from(req: GenerateQrRequest) -> Self {
        Self {
            class_name: req.class_name,
            classroom: req.classroom,
            instructor: req.instructor,
            subject: req.subject,
            time_slot: req.time_slot,
            day: req.day,
            timetable_id: req.timetable_id,
        }
    }
}

/// Response for POST /api/generate_qr
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrResponse {
    pub qr_data: SessionToken,
    pub check_in_url: String,
}

/// Request for POST /api/attend and POST /api/scan
///
/// Absent and `null` fields are treated as blank and rejected by the use case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendRequest {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub method: Option<String>,
    #[serde(alias = "tokenId")]
    pub qr_id: Option<String>,
}

/// One ledger row as the frontend shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub time: String,
    pub student_id: String,
    pub student_name: String,
    pub status: String,
    pub method: String,
}

impl From<&AttendanceRecord> for RecordResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            time: record.check_in_time.clone(),
            student_id: record.student_id.to_string(),
            student_name: record.student_name.to_string(),
            status: record.status.as_str().to_string(),
            method: record.method.to_string(),
        }
    }
}

/// Response for a successful check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendResponse {
    pub message: String,
    pub record: RecordResponse,
}

/// Response for GET /api/scan_status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatusResponse {
    pub allowed: bool,
    pub remaining_quota: i64,
    pub reset_time: Option<DateTime<Utc>>,
}

impl From<ScanQuotaOutput> for ScanStatusResponse {
    fn from(output: ScanQuotaOutput) -> Self {
        Self {
            allowed: output.allowed,
            remaining_quota: output.remaining_quota,
            reset_time: output.reset_time,
        }
    }
}

/// `?day=YYYY-MM-DD`; absent means today
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayQuery {
    pub day: Option<NaiveDate>,
}

/// Request for POST /api/classes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassRequest {
    pub name: String,
    pub room: Option<String>,
    pub instructor: Option<String>,
    pub subject: Option<String>,
}

impl From<ClassRequest> for NewClass {
    fn from(req: ClassRequest) -> Self {
        Self {
            name: req.name,
            room: req.room,
            instructor: req.instructor,
            subject: req.subject,
        }
    }
}

/// Request for POST /api/timetables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimetableRequest {
    pub class_id: Option<ClassId>,
    pub class_name: Option<String>,
    pub subject: Option<String>,
    pub instructor: Option<String>,
    pub room: Option<String>,
    pub day: String,
    pub time_slot: String,
}

impl From<TimetableRequest> for NewTimetable {
    fn from(req: TimetableRequest) -> Self {
        Self {
            class_id: req.class_id,
            class_name: req.class_name,
            subject: req.subject,
            instructor: req.instructor,
            room: req.room,
            day: req.day,
            time_slot: req.time_slot,
        }
    }
}
