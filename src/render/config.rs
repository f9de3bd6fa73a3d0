//! Rendering for `costlens config show`.

use std::path::Path;

use colored::Colorize;
use serde_json::{Map, Value};

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::storage::{Config, ConfigKey};
use crate::util::mask_secret;

const NOT_SET: &str = "(not set)";

/// Display value for a key, with secrets masked.
fn display_value(config: &Config, key: ConfigKey) -> Option<String> {
    config.get(key).map(|value| {
        if key.is_secret() {
            mask_secret(&value)
        } else {
            value
        }
    })
}

/// Render the stored configuration.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn render_config(
    config: &Config,
    path: &Path,
    format: OutputFormat,
    pretty: bool,
    color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_human(config, path, color)),
        OutputFormat::Json => render_json(config, path, pretty),
    }
}

fn render_human(config: &Config, path: &Path, color: bool) -> String {
    let heading = format!("Config file: {}", path.display());
    let mut out = if color {
        heading.bold().to_string()
    } else {
        heading
    };
    out.push('\n');

    for key in ConfigKey::ALL {
        let value = display_value(config, *key);
        let shown = match (&value, color) {
            (Some(v), _) => v.clone(),
            (None, true) => NOT_SET.dimmed().to_string(),
            (None, false) => NOT_SET.to_string(),
        };
        out.push_str(&format!("  {:<13}{shown}\n", key.as_str()));
    }
    out
}

fn render_json(config: &Config, path: &Path, pretty: bool) -> Result<String> {
    let mut values = Map::new();
    for key in ConfigKey::ALL {
        let value = display_value(config, *key).map_or(Value::Null, Value::String);
        values.insert(key.as_str().to_string(), value);
    }
    let doc = serde_json::json!({
        "path": path.display().to_string(),
        "values": values,
    });
    let rendered = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(rendered)
}
