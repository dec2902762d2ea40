//! Infrastructure Layer - Store implementations
//!
//! - `memory` - process-lifetime token store and attendance ledger
//! - `json_file` - class/timetable reference data persisted as JSON files

pub mod json_file;
pub mod memory;
