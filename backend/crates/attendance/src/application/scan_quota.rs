//! Scan Quota Use Case
//!
//! Read-only view of a client's scan window. Never records anything.

use crate::domain::clock::Clock;
use chrono::{DateTime, Utc};
use platform::rate_limit::SlidingWindowLimiter;
use std::sync::Arc;

/// Output DTO for scan quota
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanQuotaOutput {
    pub allowed: bool,
    /// Not clamped; negative if the window was over-recorded
    pub remaining_quota: i64,
    /// When the oldest live scan leaves the window
    pub reset_time: Option<DateTime<Utc>>,
}

/// Scan Quota Use Case
pub struct ScanQuotaUseCase {
    limiter: Arc<SlidingWindowLimiter>,
    clock: Arc<dyn Clock>,
}

impl ScanQuotaUseCase {
    pub fn new(limiter: Arc<SlidingWindowLimiter>, clock: Arc<dyn Clock>) -> Self {
        Self { limiter, clock }
    }

    pub async fn execute(&self, client: &str) -> ScanQuotaOutput {
        let status = self.limiter.status(client, self.clock.now()).await;
        ScanQuotaOutput {
            allowed: status.allowed,
            remaining_quota: status.remaining,
            reset_time: status.reset_at,
        }
    }
}
