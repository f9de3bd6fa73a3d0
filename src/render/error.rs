//! Error rendering for costlens.
//!
//! Human output is one colored line plus an optional hint. JSON output is a
//! single object for scripts.

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::CostlensError;

// =============================================================================
// Public API
// =============================================================================

/// Render an error for the chosen output format.
///
/// Color is used only for human output, when `no_color` is unset and stderr
/// is a terminal.
#[must_use]
pub fn render_error(
    error: &CostlensError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Human => {
            let color = !no_color
                && crate::util::env::stderr_is_tty()
                && crate::util::env::should_use_color(false);
            render_human(error, color)
        }
    }
}

/// Render an error as a JSON object.
#[must_use]
pub fn render_error_json(error: &CostlensError, pretty: bool) -> String {
    let wrapper = ErrorWrapper {
        error: ErrorJson::from_error(error),
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&wrapper)
    } else {
        serde_json::to_string(&wrapper)
    };
    rendered.unwrap_or_else(|_| render_human(error, false))
}

// =============================================================================
// Human Rendering
// =============================================================================

fn render_human(error: &CostlensError, color: bool) -> String {
    let code = format!("[{}]", error.error_code());
    let mut out = if color {
        format!("{} {} {}", "Error:".red().bold(), error, code.dimmed())
    } else {
        format!("Error: {error} {code}")
    };

    if let Some(hint) = error.hint() {
        out.push('\n');
        if color {
            out.push_str(&format!("{} {}", "Hint:".yellow(), hint));
        } else {
            out.push_str(&format!("Hint: {hint}"));
        }
    }
    out
}

// =============================================================================
// JSON Rendering
// =============================================================================

#[derive(Serialize)]
struct ErrorWrapper {
    error: ErrorJson,
}

#[derive(Serialize)]
struct ErrorJson {
    code: &'static str,
    category: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &CostlensError) -> Self {
        Self {
            code: error.error_code(),
            category: error.category().to_string(),
            message: error.to_string(),
            hint: error.hint(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_key() -> CostlensError {
        CostlensError::ConfigMissing {
            key: "api_key".to_string(),
        }
    }

    #[test]
    fn human_render_includes_code_and_hint() {
        let output = render_human(&missing_key(), false);
        assert!(output.starts_with("Error: api_key is not configured"));
        assert!(output.contains("CL-C001"));
        assert!(output.contains("Hint: Run `costlens config set api_key"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn human_render_without_hint_is_one_line() {
        let err = CostlensError::ParseResponse("eof".to_string());
        assert_eq!(render_human(&err, false).lines().count(), 1);
    }

    #[test]
    fn no_color_flag_disables_ansi() {
        let output = render_error(&missing_key(), OutputFormat::Human, true, false);
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn json_render_has_error_object() {
        let output = render_error(&missing_key(), OutputFormat::Json, false, false);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["error"]["code"], "CL-C001");
        assert_eq!(json["error"]["category"], "Configuration error");
        assert_eq!(json["error"]["message"], "api_key is not configured");
        assert!(json["error"]["hint"].is_string());
        assert!(!output.contains('\n'));
    }

    #[test]
    fn json_render_omits_missing_hint() {
        let err = CostlensError::ParseResponse("eof".to_string());
        let json: serde_json::Value =
            serde_json::from_str(&render_error_json(&err, true)).unwrap();
        assert!(json["error"].get("hint").is_none());
        assert_eq!(json["error"]["category"], "API error");
    }
}
