//! Check-In Use Case
//!
//! Validates one check-in request and, when every check passes, writes the
//! record to the ledger. Checks run in a fixed order and the first failure
//! ends the request:
//!
//! 1. required fields
//! 2. scan rate limit (rate-limited channel only)
//! 3. same-day duplicate
//! 4. token existence and expiry (`"qr"` method only)
//! 5. ledger insert, which re-checks the duplicate atomically
//!
//! The scan slot is consumed only after the insert succeeded.

use crate::application::config::AttendanceConfig;
use crate::domain::clock::Clock;
use crate::domain::entities::{AttendanceRecord, AttendanceStatus};
use crate::domain::repository::{LedgerInsert, LedgerRepository, TokenRepository};
use crate::domain::value_objects::{CheckInMethod, StudentId, StudentName};
use crate::error::{AttendanceError, AttendanceResult};
use chrono::{DateTime, Utc};
use kernel::id::TokenId;
use platform::rate_limit::SlidingWindowLimiter;
use std::sync::Arc;

/// How the request reached us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInChannel {
    /// Manual entry or QR submission without scan accounting
    Direct,
    /// Scanner endpoint; `client` is the rate-limit identity
    RateLimited { client: String },
}

/// Input DTO for check-in. Raw strings; validated by the use case.
#[derive(Debug, Clone)]
pub struct CheckInInput {
    pub student_id: String,
    pub student_name: String,
    pub method: String,
    pub token_id: Option<String>,
    pub channel: CheckInChannel,
}

/// Check-In Use Case
pub struct CheckInUseCase<T, L>
where
    T: TokenRepository,
    L: LedgerRepository,
{
    token_repo: Arc<T>,
    ledger_repo: Arc<L>,
    limiter: Arc<SlidingWindowLimiter>,
    clock: Arc<dyn Clock>,
    config: Arc<AttendanceConfig>,
}

impl<T, L> CheckInUseCase<T, L>
where
    T: TokenRepository,
    L: LedgerRepository,
{
    pub fn new(
        token_repo: Arc<T>,
        ledger_repo: Arc<L>,
        limiter: Arc<SlidingWindowLimiter>,
        clock: Arc<dyn Clock>,
        config: Arc<AttendanceConfig>,
    ) -> Self {
        Self {
            token_repo,
            ledger_repo,
            limiter,
            clock,
            config,
        }
    }

    pub async fn execute(&self, input: CheckInInput) -> AttendanceResult<AttendanceRecord> {
        let student_id = StudentId::new(&input.student_id)?;
        let student_name = StudentName::new(&input.student_name)?;
        let method = CheckInMethod::new(&input.method)?;

        let now = self.clock.now();

        // Outermost gate on the scanner channel; held until the record is in
        let permit = match &input.channel {
            CheckInChannel::Direct => None,
            CheckInChannel::RateLimited { client } => {
                Some(self.limiter.try_acquire(client, now).await?)
            }
        };

        let day = self.config.local_day(now);
        if self.ledger_repo.has_record(day, &student_id).await? {
            tracing::info!(student_id = %student_id, %day, "Duplicate check-in");
            return Err(AttendanceError::DuplicateCheckIn);
        }

        let token_id = if method.requires_token() {
            Some(self.validate_token(input.token_id.as_deref(), now).await?)
        } else {
            None
        };

        let record = AttendanceRecord {
            day,
            student_id,
            student_name,
            check_in_time: self.config.local_time(now),
            checked_in_at: now,
            status: AttendanceStatus::Present,
            method,
            token_id,
        };

        if self.ledger_repo.insert_record(record.clone()).await? == LedgerInsert::Conflict {
            tracing::info!(student_id = %record.student_id, %day, "Duplicate check-in (raced)");
            return Err(AttendanceError::DuplicateCheckIn);
        }

        if let Some(permit) = permit {
            permit.record(now);
        }

        tracing::info!(
            student_id = %record.student_id,
            method = %record.method,
            %day,
            time = %record.check_in_time,
            "Attendance recorded"
        );

        Ok(record)
    }

    /// Resolve a presented token id, removing it if it has expired
    async fn validate_token(
        &self,
        raw_token_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AttendanceResult<TokenId> {
        let token_id = raw_token_id
            .and_then(|raw| TokenId::parse_str(raw).ok())
            .ok_or(AttendanceError::InvalidToken)?;

        let token = self
            .token_repo
            .find_token(token_id)
            .await?
            .ok_or(AttendanceError::InvalidToken)?;

        if token.is_expired(now) {
            self.token_repo.invalidate_token(token_id).await?;
            tracing::warn!(
                token_id = %token_id,
                expired_at = %token.expires_at,
                "Expired token presented"
            );
            return Err(AttendanceError::TokenExpired);
        }

        Ok(token_id)
    }
}
