//! Application Configuration
//!
//! Configuration for the attendance application layer.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeDelta, Utc};
use kernel::id::TokenId;
use platform::rate_limit::RateLimitConfig;

/// Successful rate-limited check-ins allowed per client per scan window.
/// Fixed; there is no burst allowance.
pub const SCAN_CAPACITY: u32 = 1;

/// Metadata used when a token is issued without a value for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPlaceholders {
    pub class_name: String,
    pub classroom: String,
    pub instructor: String,
    pub subject: String,
    pub time_slot: String,
    pub day: String,
}

impl Default for MetadataPlaceholders {
    fn default() -> Self {
        Self {
            class_name: "Computer Science 101".to_string(),
            classroom: "Room 205".to_string(),
            instructor: "Dr. Smith".to_string(),
            subject: "N/A".to_string(),
            time_slot: "N/A".to_string(),
            day: "N/A".to_string(),
        }
    }
}

/// Attendance application configuration
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    /// How long an issued token accepts check-ins
    pub token_ttl: Duration,
    /// Sliding window for rate-limited scans
    pub scan_window: Duration,
    /// Institution offset; decides the ledger day and the check-in time
    pub utc_offset: FixedOffset,
    /// Base of the URL embedded in QR codes
    pub check_in_base_url: String,
    /// Directory holding the class and timetable files
    pub data_dir: PathBuf,
    pub placeholders: MetadataPlaceholders,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(30 * 60),
            scan_window: Duration::from_secs(30 * 60),
            utc_offset: Utc.fix(),
            check_in_base_url: "http://localhost:31113".to_string(),
            data_dir: PathBuf::from("data"),
            placeholders: MetadataPlaceholders::default(),
        }
    }
}

impl AttendanceConfig {
    /// Defaults, but with the host's current UTC offset
    pub fn development() -> Self {
        Self {
            utc_offset: *Local::now().offset(),
            ..Self::default()
        }
    }

    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }

    pub fn token_ttl_delta(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.token_ttl_ms())
    }

    pub fn scan_rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: SCAN_CAPACITY,
            window: self.scan_window,
        }
    }

    /// Ledger partition for an instant
    pub fn local_day(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    /// `HH:MM:SS` wall-clock time for an instant
    pub fn local_time(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.utc_offset)
            .format("%H:%M:%S")
            .to_string()
    }

    pub fn check_in_url(&self, token_id: TokenId) -> String {
        format!(
            "{}/checkin?token={}",
            self.check_in_base_url.trim_end_matches('/'),
            token_id
        )
    }
}
