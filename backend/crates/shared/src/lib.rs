//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! attendance backend:
//! - Common error types and result aliases
//! - Typed identifiers for tokens and reference data
//!
//! Only things with a stable meaning across every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
