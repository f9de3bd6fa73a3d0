//! Phase-tracking logger for integration tests.
#![allow(dead_code)]
//!
//! Writes one line per event to stderr so `cargo test -- --nocapture` shows
//! where a failing test was.
//!
//! - `TEST_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//! - `TEST_LOG_JSON`: "1" or "true" for JSON lines
//! - `NO_COLOR`: plain level tags

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::Level;

struct Settings {
    max_level: Level,
    json: bool,
    color: bool,
}

fn settings() -> &'static Settings {
    static SETTINGS: OnceLock<Settings> = OnceLock::new();
    SETTINGS.get_or_init(|| Settings {
        max_level: std::env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(Level::INFO),
        json: std::env::var("TEST_LOG_JSON")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        color: std::env::var_os("NO_COLOR").is_none(),
    })
}

fn ansi(level: Level) -> &'static str {
    if level == Level::ERROR {
        "\x1b[31m"
    } else if level == Level::WARN {
        "\x1b[33m"
    } else if level == Level::INFO {
        "\x1b[32m"
    } else if level == Level::DEBUG {
        "\x1b[36m"
    } else {
        "\x1b[90m"
    }
}

/// Per-test logger with a current phase and elapsed time.
pub struct TestLogger {
    name: String,
    started: Instant,
    phase: Mutex<String>,
}

impl TestLogger {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let logger = Self {
            name: name.to_string(),
            started: Instant::now(),
            phase: Mutex::new("init".to_string()),
        };
        logger.emit(Level::INFO, "starting", None);
        logger
    }

    /// Enter a named phase (setup, execute, verify).
    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.phase.lock() {
            phase.clone_into(&mut current);
        }
        self.emit(Level::DEBUG, "phase entered", None);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::DEBUG, message, None);
    }

    pub fn http_request(&self, method: &str, url: &str) {
        self.debug(&format!("HTTP {method} {url}"));
    }

    pub fn finish_ok(&self) {
        let elapsed = self.started.elapsed().as_millis();
        self.emit(Level::INFO, &format!("passed in {elapsed}ms"), Some(elapsed));
    }

    fn emit(&self, level: Level, message: &str, duration_ms: Option<u128>) {
        let settings = settings();
        if level > settings.max_level {
            return;
        }
        let phase = self.phase.lock().map(|p| p.clone()).unwrap_or_default();
        let now = Utc::now();

        if settings.json {
            let mut line = json!({
                "timestamp": now.to_rfc3339(),
                "level": level.as_str(),
                "test": self.name,
                "phase": phase,
                "message": message,
            });
            if let Some(ms) = duration_ms {
                line["duration_ms"] = json!(u64::try_from(ms).unwrap_or(u64::MAX));
            }
            eprintln!("{line}");
            return;
        }

        let ts = now.format("%H:%M:%S%.3f");
        let tag = if settings.color {
            format!("{}{:5}\x1b[0m", ansi(level), level.as_str())
        } else {
            format!("{:5}", level.as_str())
        };
        eprintln!("[{ts}] {tag} {}:{phase} {message}", self.name);
    }
}
