//! Shared helpers for integration tests.
//!
//! - `logger`: phase-tracking test logger

pub mod logger;
