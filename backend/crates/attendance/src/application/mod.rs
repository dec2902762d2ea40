//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod catalog;
pub mod check_in;
pub mod config;
pub mod export;
pub mod issue_token;
pub mod list_attendance;
pub mod scan_quota;

pub use catalog::{CatalogUseCase, NewClass, NewTimetable};
pub use check_in::{CheckInChannel, CheckInInput, CheckInUseCase};
pub use export::{AttendanceWorkbook, ExportAttendanceUseCase};
pub use issue_token::{IssueTokenInput, IssueTokenOutput, IssueTokenUseCase};
pub use list_attendance::{AttendanceDay, ListAttendanceUseCase};
pub use scan_quota::{ScanQuotaOutput, ScanQuotaUseCase};
