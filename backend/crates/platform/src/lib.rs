//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client identification from HTTP headers
//! - Sliding-window rate limiting

pub mod client;
pub mod rate_limit;
