//! Test utilities for costlens.
//!
//! Scripted stand-ins for the terminal and the remote endpoint, plus a few
//! filesystem and output helpers shared by unit and integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use costlens::test_utils::*;
//!
//! let endpoint = MockEndpoint::new();
//! endpoint.push_reply("Hi!", Some(0.002), Some(15));
//! let input = ScriptedInput::new(&["Hello", "quit"]);
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::chat::input::LineSource;
use crate::chat::session::SessionParams;
use crate::core::endpoint::{ChatEndpoint, ChatReply, ChatRequest};
use crate::error::{CostlensError, Result};
use crate::storage::config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE};

// =============================================================================
// Session Factories
// =============================================================================

/// Session parameters with every value at its default.
#[must_use]
pub fn make_test_params() -> SessionParams {
    SessionParams {
        model: DEFAULT_MODEL.to_string(),
        temperature: DEFAULT_TEMPERATURE,
        max_tokens: DEFAULT_MAX_TOKENS,
        system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        history_enabled: true,
    }
}

/// A reply with the given content and figures.
#[must_use]
pub fn make_test_reply(content: &str, cost: Option<f64>, tokens: Option<u64>) -> ChatReply {
    ChatReply {
        content: content.to_string(),
        cost,
        tokens,
    }
}

// =============================================================================
// Scripted Input
// =============================================================================

/// A [`LineSource`] that yields a fixed script, then end of input.
///
/// Dropping it sets the flag returned by [`ScriptedInput::released`].
#[derive(Debug)]
pub struct ScriptedInput {
    lines: VecDeque<Result<String>>,
    released: Arc<AtomicBool>,
}

impl ScriptedInput {
    /// Script the given lines.
    #[must_use]
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| Ok((*l).to_string())).collect(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fail the read after the scripted lines.
    #[must_use]
    pub fn then_error(mut self, error: CostlensError) -> Self {
        self.lines.push_back(Err(error));
        self
    }

    /// Flag that flips once this input has been dropped.
    #[must_use]
    pub fn released(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl Drop for ScriptedInput {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl LineSource for ScriptedInput {
    async fn next_line(&mut self) -> Result<Option<String>> {
        self.lines.pop_front().transpose()
    }
}

// =============================================================================
// Mock Endpoint
// =============================================================================

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<Result<ChatReply>>,
    requests: Vec<ChatRequest>,
}

/// A [`ChatEndpoint`] that answers from a script and records every request.
///
/// Clones share the same script and recording, so a test can keep a handle
/// after moving one into a controller.
#[derive(Debug, Clone, Default)]
pub struct MockEndpoint {
    state: Arc<Mutex<MockState>>,
}

impl MockEndpoint {
    /// An endpoint with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, content: &str, cost: Option<f64>, tokens: Option<u64>) {
        self.lock()
            .replies
            .push_back(Ok(make_test_reply(content, cost, tokens)));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CostlensError) {
        self.lock().replies.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }
}

impl ChatEndpoint for MockEndpoint {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(CostlensError::Network("no scripted reply".to_string())))
    }
}

// =============================================================================
// Temp Directory Utilities
// =============================================================================

/// A temporary directory for tests with automatic cleanup.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A config file body with both connection settings present.
#[must_use]
pub fn make_test_config_toml(base_url: &str) -> String {
    format!(
        "api_key = \"sk-test-0000000000000000\"\nbase_url = \"{base_url}\"\nmodel = \"gpt-4o-mini\"\ntemperature = 0.7\nmax_tokens = 1000\n"
    )
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b')
}

/// Captured controller output as text.
///
/// # Panics
///
/// Panics if the output is not UTF-8.
#[must_use]
pub fn output_text(output: Vec<u8>) -> String {
    String::from_utf8(output).expect("session output should be UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_input_ends_with_none() {
        let mut input = ScriptedInput::new(&["one"]);
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("one"));
        assert!(input.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn scripted_input_reports_release() {
        let input = ScriptedInput::new(&[]);
        let released = input.released();
        assert!(!released.load(Ordering::SeqCst));
        drop(input);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn mock_endpoint_shares_state_across_clones() {
        let endpoint = MockEndpoint::new();
        let handle = endpoint.clone();
        endpoint.push_reply("Hi!", Some(0.002), Some(15));

        let request = ChatRequest {
            model_id: "m".to_string(),
            message: "Hello".to_string(),
            temperature: 0.7,
            max_tokens: 10,
        };
        assert_eq!(endpoint.send(&request).await.unwrap().content, "Hi!");
        assert!(endpoint.send(&request).await.is_err());
        assert_eq!(handle.call_count(), 2);
        assert_eq!(handle.requests()[0].message, "Hello");
    }

    #[test]
    fn test_dir_creates_files() {
        let dir = TestDir::new();
        dir.create_file("nested/config.toml", &make_test_config_toml("http://x.test"));
        assert!(dir.file_path("nested/config.toml").exists());
    }
}
