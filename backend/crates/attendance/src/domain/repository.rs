//! Repository Traits
//!
//! Interfaces for the attendance stores. Implementations are in the infra
//! layer.

use chrono::NaiveDate;
use kernel::id::{ClassId, TimetableId, TokenId};

use crate::domain::entities::{AttendanceRecord, ClassInfo, SessionToken, TimetableEntry};
use crate::domain::value_objects::StudentId;
use crate::error::AttendanceResult;

/// Outcome of a ledger insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerInsert {
    Inserted,
    /// The student already had a record for that day
    Conflict,
}

/// Session token store
#[trait_variant::make(TokenRepository: Send)]
pub trait LocalTokenRepository {
    /// Store a freshly issued token
    async fn save_token(&self, token: &SessionToken) -> AttendanceResult<()>;

    /// Look a token up. Expiry is not checked here.
    async fn find_token(&self, token_id: TokenId) -> AttendanceResult<Option<SessionToken>>;

    /// Remove a token; a no-op when it is absent
    async fn invalidate_token(&self, token_id: TokenId) -> AttendanceResult<()>;
}

/// Day-partitioned attendance ledger
#[trait_variant::make(LedgerRepository: Send)]
pub trait LocalLedgerRepository {
    async fn has_record(&self, day: NaiveDate, student_id: &StudentId) -> AttendanceResult<bool>;

    /// Append a record unless its student already has one for `record.day`.
    /// The check and the append are atomic.
    async fn insert_record(&self, record: AttendanceRecord) -> AttendanceResult<LedgerInsert>;

    /// Records in insertion order; empty for an unknown day
    async fn records_for_day(&self, day: NaiveDate) -> AttendanceResult<Vec<AttendanceRecord>>;
}

/// Class and timetable reference data
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    async fn list_classes(&self) -> AttendanceResult<Vec<ClassInfo>>;

    async fn save_class(&self, class: ClassInfo) -> AttendanceResult<()>;

    /// Returns false when no class had that id
    async fn delete_class(&self, class_id: ClassId) -> AttendanceResult<bool>;

    async fn list_timetables(&self) -> AttendanceResult<Vec<TimetableEntry>>;

    async fn find_timetable(
        &self,
        timetable_id: TimetableId,
    ) -> AttendanceResult<Option<TimetableEntry>>;

    async fn save_timetable(&self, entry: TimetableEntry) -> AttendanceResult<()>;

    /// Returns false when no entry had that id
    async fn delete_timetable(&self, timetable_id: TimetableId) -> AttendanceResult<bool>;
}
