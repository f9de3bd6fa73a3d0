//! costlens - cost-tracking chat client
//!
//! An interactive chat session against a remote cost-tracking backend. Each
//! reply carries the backend's cost and token figures, which the session
//! accumulates and reports.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod chat;
pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{CostlensError, ExitCode, Result};
