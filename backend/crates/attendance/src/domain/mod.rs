//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (SessionToken, AttendanceRecord, ClassInfo, TimetableEntry)
//! - Domain value objects (StudentId, StudentName, CheckInMethod)
//! - The clock every expiry and window computation is relative to
//! - Repository traits (interfaces)

pub mod clock;
pub mod entities;
pub mod repository;
pub mod value_objects;
