//! Logging setup.
//!
//! Logs go to stderr (or `COSTLENS_LOG_FILE`) so they never interleave with
//! the chat transcript on stdout. The default level is `error`, which keeps an
//! interactive session quiet.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::util::env::non_empty_var;

/// Log level override.
pub const LOG_LEVEL_ENV: &str = "COSTLENS_LOG";
/// Log format override (`human`, `compact`, `json`).
pub const LOG_FORMAT_ENV: &str = "COSTLENS_LOG_FORMAT";
/// Append logs to this file instead of stderr.
pub const LOG_FILE_ENV: &str = "COSTLENS_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field lines without timestamps.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
    /// Terse single lines with targets.
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Parse a level name. `verbose` means debug and `critical` means error.
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" | "verbose" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "critical" => Some(Level::ERROR),
        _ => None,
    }
}

/// Effective logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::ERROR,
            format: LogFormat::Human,
            file: None,
        }
    }
}

impl LogSettings {
    /// Combine CLI flags with the process environment.
    #[must_use]
    pub fn resolve(flag_level: Option<&str>, json_output: bool, verbose: bool) -> Self {
        Self::resolve_with_env(flag_level, json_output, verbose, non_empty_var)
    }

    /// Combine CLI flags with an explicit environment lookup.
    ///
    /// An explicit level (flag, then `COSTLENS_LOG`) wins over `--verbose`.
    /// Unparseable values fall through to the next source.
    #[must_use]
    pub fn resolve_with_env<F>(
        flag_level: Option<&str>,
        json_output: bool,
        verbose: bool,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = flag_level
            .and_then(parse_level)
            .or_else(|| env(LOG_LEVEL_ENV).as_deref().and_then(parse_level));
        let level = explicit.unwrap_or(if verbose { Level::DEBUG } else { Level::ERROR });

        let format = if json_output {
            LogFormat::Json
        } else {
            env(LOG_FORMAT_ENV)
                .as_deref()
                .and_then(LogFormat::from_arg)
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: env(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Filter directive for this crate. `RUST_LOG` replaces it when set.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("costlens={}", self.level.as_str().to_lowercase())
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

fn open_log_file(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(settings: &LogSettings) {
    let writer = settings
        .file
        .as_deref()
        .and_then(open_log_file)
        .map_or_else(
            || BoxMakeWriter::new(std::io::stderr),
            |file| BoxMakeWriter::new(Mutex::new(file)),
        );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_writer(writer);

    let installed = match settings.format {
        LogFormat::Json => builder.json().with_span_events(FmtSpan::CLOSE).try_init(),
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
        LogFormat::Human => builder.with_target(false).without_time().try_init(),
    };
    installed.ok();
}
