//! QR Attendance Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, clock
//! - `application/` - Use cases
//! - `infra/` - In-memory ledger/token store, JSON file catalog
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Check-in Model
//! - A token is issued per class session and accepts check-ins for 30 minutes
//! - A student is recorded at most once per local calendar day
//! - The scanner endpoint allows one successful check-in per client IP per
//!   30-minute sliding window
//! - Only the `"qr"` method is validated against the token store
//!
//! Tokens, scan windows and the ledger live in memory; a restart clears them.
//! Classes and timetables are persisted as JSON files.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AttendanceConfig;
pub use error::{AttendanceError, AttendanceResult};
pub use infra::json_file::JsonFileCatalog;
pub use infra::memory::MemoryAttendanceStore;
pub use presentation::router::{attendance_router, attendance_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod clock {
    pub use crate::domain::clock::*;
}
