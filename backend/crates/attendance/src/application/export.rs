//! Export Attendance Use Case
//!
//! Renders one ledger day as an xlsx workbook with a single "Attendance"
//! sheet: a bold header row, then one row per record in check-in order.

use crate::application::list_attendance::ListAttendanceUseCase;
use crate::domain::entities::AttendanceRecord;
use crate::domain::repository::LedgerRepository;
use crate::error::{AttendanceError, AttendanceResult};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Attendance";
const HEADERS: [&str; 5] = ["Time", "Student ID", "Student Name", "Status", "Method"];

/// A rendered export
#[derive(Debug, Clone)]
pub struct AttendanceWorkbook {
    pub day: NaiveDate,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

/// Export Attendance Use Case
pub struct ExportAttendanceUseCase<L>
where
    L: LedgerRepository,
{
    list: ListAttendanceUseCase<L>,
}

impl<L> ExportAttendanceUseCase<L>
where
    L: LedgerRepository,
{
    pub fn new(list: ListAttendanceUseCase<L>) -> Self {
        Self { list }
    }

    pub async fn execute(&self, day: Option<NaiveDate>) -> AttendanceResult<AttendanceWorkbook> {
        let listing = self.list.execute(day).await?;
        if listing.records.is_empty() {
            return Err(AttendanceError::NoAttendanceData);
        }

        let bytes = render_workbook(&listing.records)?;
        tracing::info!(
            day = %listing.day,
            rows = listing.records.len(),
            size = bytes.len(),
            "Attendance exported"
        );

        Ok(AttendanceWorkbook {
            file_name: format!("Attendance_Report_{}.xlsx", listing.day.format("%Y-%m-%d")),
            day: listing.day,
            rows: listing.records.len(),
            bytes,
        })
    }
}

fn render_workbook(records: &[AttendanceRecord]) -> AttendanceResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        let cells = [
            record.check_in_time.as_str(),
            record.student_id.as_str(),
            record.student_name.as_str(),
            record.status.as_str(),
            record.method.as_str(),
        ];
        for (col, value) in (0u16..).zip(cells) {
            sheet.write_string(row, col, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AttendanceStatus;
    use crate::domain::value_objects::{CheckInMethod, StudentId, StudentName};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_produces_zip_container() {
        let record = AttendanceRecord {
            day: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            student_id: StudentId::new("S1").unwrap(),
            student_name: StudentName::new("Ann").unwrap(),
            check_in_time: "10:05:00".into(),
            checked_in_at: Utc.with_ymd_and_hms(2024, 5, 6, 10, 5, 0).unwrap(),
            status: AttendanceStatus::Present,
            method: CheckInMethod::Qr,
            token_id: None,
        };

        let bytes = render_workbook(&[record]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
