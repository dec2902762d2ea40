//! In-Memory Repository Implementations
//!
//! Tokens and attendance records live for the lifetime of the process; a
//! restart clears them. Each map sits behind its own short-held lock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use kernel::id::TokenId;
use tokio::sync::RwLock;

use crate::domain::entities::{AttendanceRecord, SessionToken};
use crate::domain::repository::{LedgerInsert, LedgerRepository, TokenRepository};
use crate::domain::value_objects::StudentId;
use crate::error::{AttendanceError, AttendanceResult};

/// One day of the ledger
#[derive(Debug, Default)]
struct DayPartition {
    records: Vec<AttendanceRecord>,
    students: HashSet<StudentId>,
}

/// In-memory token store and ledger
#[derive(Clone, Default)]
pub struct MemoryAttendanceStore {
    tokens: Arc<RwLock<HashMap<TokenId, SessionToken>>>,
    ledger: Arc<RwLock<HashMap<NaiveDate, DayPartition>>>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens currently held, expired ones included
    pub async fn token_count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl TokenRepository for MemoryAttendanceStore {
    async fn save_token(&self, token: &SessionToken) -> AttendanceResult<()> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.id) {
            return Err(AttendanceError::Internal(format!(
                "token id {} already issued",
                token.id
            )));
        }
        tokens.insert(token.id, token.clone());

        tracing::debug!(token_id = %token.id, "Token stored");
        Ok(())
    }

    async fn find_token(&self, token_id: TokenId) -> AttendanceResult<Option<SessionToken>> {
        Ok(self.tokens.read().await.get(&token_id).cloned())
    }

    async fn invalidate_token(&self, token_id: TokenId) -> AttendanceResult<()> {
        if self.tokens.write().await.remove(&token_id).is_some() {
            tracing::info!(token_id = %token_id, "Token invalidated");
        }
        Ok(())
    }
}

impl LedgerRepository for MemoryAttendanceStore {
    async fn has_record(&self, day: NaiveDate, student_id: &StudentId) -> AttendanceResult<bool> {
        Ok(self
            .ledger
            .read()
            .await
            .get(&day)
            .is_some_and(|partition| partition.students.contains(student_id)))
    }

    async fn insert_record(&self, record: AttendanceRecord) -> AttendanceResult<LedgerInsert> {
        let mut ledger = self.ledger.write().await;
        let partition = ledger.entry(record.day).or_default();

        if !partition.students.insert(record.student_id.clone()) {
            return Ok(LedgerInsert::Conflict);
        }
        partition.records.push(record);
        Ok(LedgerInsert::Inserted)
    }

    async fn records_for_day(&self, day: NaiveDate) -> AttendanceResult<Vec<AttendanceRecord>> {
        Ok(self
            .ledger
            .read()
            .await
            .get(&day)
            .map(|partition| partition.records.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AttendanceStatus, TokenMetadata};
    use crate::domain::value_objects::{CheckInMethod, StudentName};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn metadata() -> TokenMetadata {
        TokenMetadata {
            class_name: "Computer Science 101".into(),
            classroom: "Room 205".into(),
            instructor: "Dr. Smith".into(),
            subject: "N/A".into(),
            time_slot: "N/A".into(),
            day: "N/A".into(),
            timetable_id: None,
        }
    }

    fn record(day: NaiveDate, student: &str) -> AttendanceRecord {
        AttendanceRecord {
            day,
            student_id: StudentId::new(student).unwrap(),
            student_name: StudentName::new("Alice").unwrap(),
            check_in_time: "10:05:00".into(),
            checked_in_at: Utc.with_ymd_and_hms(2026, 3, 2, 10, 5, 0).unwrap(),
            status: AttendanceStatus::Present,
            method: CheckInMethod::Manual,
            token_id: None,
        }
    }

    #[tokio::test]
    async fn test_token_roundtrip_and_idempotent_invalidate() {
        let store = MemoryAttendanceStore::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let token = SessionToken::new(metadata(), now, TimeDelta::minutes(30));

        store.save_token(&token).await.unwrap();
        assert_eq!(store.find_token(token.id).await.unwrap(), Some(token.clone()));

        store.invalidate_token(token.id).await.unwrap();
        store.invalidate_token(token.id).await.unwrap();
        store.invalidate_token(TokenId::new()).await.unwrap();
        assert_eq!(store.find_token(token.id).await.unwrap(), None);
        assert_eq!(store.token_count().await, 0);
    }

    #[tokio::test]
    async fn test_same_token_cannot_be_saved_twice() {
        let store = MemoryAttendanceStore::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let token = SessionToken::new(metadata(), now, TimeDelta::minutes(30));

        store.save_token(&token).await.unwrap();
        assert!(matches!(
            store.save_token(&token).await,
            Err(AttendanceError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_ledger_conflict_per_day() {
        let store = MemoryAttendanceStore::new();
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        assert_eq!(
            store.insert_record(record(monday, "S1")).await.unwrap(),
            LedgerInsert::Inserted
        );
        assert_eq!(
            store.insert_record(record(monday, "S1")).await.unwrap(),
            LedgerInsert::Conflict
        );
        assert_eq!(
            store.insert_record(record(tuesday, "S1")).await.unwrap(),
            LedgerInsert::Inserted
        );

        let s1 = StudentId::new("S1").unwrap();
        assert!(store.has_record(monday, &s1).await.unwrap());
        assert!(!store.has_record(monday, &StudentId::new("S2").unwrap()).await.unwrap());
        assert_eq!(store.records_for_day(monday).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_records_keep_insertion_order() {
        let store = MemoryAttendanceStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        for student in ["S3", "S1", "S2"] {
            store.insert_record(record(day, student)).await.unwrap();
        }

        let ids: Vec<String> = store
            .records_for_day(day)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.student_id.into())
            .collect();
        assert_eq!(ids, ["S3", "S1", "S2"]);

        let unknown = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(store.records_for_day(unknown).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_for_same_student() {
        let store = MemoryAttendanceStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_record(record(day, "S1")).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == LedgerInsert::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
    }
}
