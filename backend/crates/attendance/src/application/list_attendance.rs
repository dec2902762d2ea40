//! List Attendance Use Case

use crate::application::config::AttendanceConfig;
use crate::domain::clock::Clock;
use crate::domain::entities::AttendanceRecord;
use crate::domain::repository::LedgerRepository;
use crate::error::AttendanceResult;
use chrono::NaiveDate;
use std::sync::Arc;

/// One ledger day, records in check-in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDay {
    pub day: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

/// List Attendance Use Case
pub struct ListAttendanceUseCase<L>
where
    L: LedgerRepository,
{
    ledger_repo: Arc<L>,
    clock: Arc<dyn Clock>,
    config: Arc<AttendanceConfig>,
}

impl<L> ListAttendanceUseCase<L>
where
    L: LedgerRepository,
{
    pub fn new(ledger_repo: Arc<L>, clock: Arc<dyn Clock>, config: Arc<AttendanceConfig>) -> Self {
        Self {
            ledger_repo,
            clock,
            config,
        }
    }

    /// `day` defaults to the current local day
    pub async fn execute(&self, day: Option<NaiveDate>) -> AttendanceResult<AttendanceDay> {
        let day = day.unwrap_or_else(|| self.config.local_day(self.clock.now()));
        let records = self.ledger_repo.records_for_day(day).await?;
        Ok(AttendanceDay { day, records })
    }
}
