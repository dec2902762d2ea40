//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use handlers::{AttendanceAppState, AttendanceStore, ReferenceCatalog};
pub use router::{attendance_router, attendance_router_generic};
