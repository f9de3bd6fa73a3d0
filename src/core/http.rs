//! HTTP client utilities.
//!
//! Provides the shared HTTP client used to talk to the backend.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{CostlensError, Result};

/// Default timeout for backend requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("costlens/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CostlensError::Network(e.to_string()))
}

/// Classify a transport-level failure (no usable response).
#[must_use]
pub fn map_send_error(error: &reqwest::Error, timeout: Duration) -> CostlensError {
    if error.is_timeout() {
        CostlensError::Timeout(timeout.as_secs())
    } else {
        CostlensError::Network(error.to_string())
    }
}
