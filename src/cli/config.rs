//! Config command implementation.

use std::path::Path;

use crate::cli::args::{ConfigCommand, OutputFormat};
use crate::error::{CostlensError, Result};
use crate::render::render_config;
use crate::storage::{Config, ConfigKey};
use crate::util::env::should_use_color;
use crate::util::mask_secret;

/// Execute a config subcommand against the default config file.
///
/// # Errors
///
/// Returns error if the key is unknown, the value is invalid, or the file
/// cannot be read or written.
pub fn execute(
    command: &ConfigCommand,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    let path = Config::config_path();
    let output = run(command, &path, format, pretty, should_use_color(no_color))?;
    print!("{output}");
    Ok(())
}

/// Execute a config subcommand against an explicit file and return the text
/// to print.
///
/// # Errors
///
/// See [`execute`].
pub fn run(
    command: &ConfigCommand,
    path: &Path,
    format: OutputFormat,
    pretty: bool,
    color: bool,
) -> Result<String> {
    match command {
        ConfigCommand::Get { key } => {
            let key = ConfigKey::from_arg(key)?;
            let config = Config::load_from(path)?;
            let value = config.get(key).ok_or_else(|| CostlensError::ConfigMissing {
                key: key.to_string(),
            })?;
            match format {
                OutputFormat::Human => Ok(format!("{value}\n")),
                OutputFormat::Json => key_value_json(key, Some(&value), pretty),
            }
        }
        ConfigCommand::Set { key, value } => {
            let key = ConfigKey::from_arg(key)?;
            let mut config = Config::load_from(path)?;
            config.set(key, value)?;
            config.save_to(path)?;
            tracing::info!(%key, path = %path.display(), "Config value set");

            let shown = config.get(key).map(|v| display(key, &v));
            match format {
                OutputFormat::Human => Ok(format!(
                    "Set {key} = {}\n",
                    shown.unwrap_or_default()
                )),
                OutputFormat::Json => key_value_json(key, shown.as_deref(), pretty),
            }
        }
        ConfigCommand::Unset { key } => {
            let key = ConfigKey::from_arg(key)?;
            let mut config = Config::load_from(path)?;
            config.unset(key);
            config.save_to(path)?;
            tracing::info!(%key, path = %path.display(), "Config value unset");

            let shown = config.get(key).map(|v| display(key, &v));
            match format {
                OutputFormat::Human => Ok(match shown {
                    Some(default) => format!("Reset {key} to {default}\n"),
                    None => format!("Removed {key}\n"),
                }),
                OutputFormat::Json => key_value_json(key, shown.as_deref(), pretty),
            }
        }
        ConfigCommand::Show => {
            let config = Config::load_from(path)?;
            let mut out = render_config(&config, path, format, pretty, color)?;
            if format == OutputFormat::Json {
                out.push('\n');
            }
            Ok(out)
        }
        ConfigCommand::Path => match format {
            OutputFormat::Human => Ok(format!("{}\n", path.display())),
            OutputFormat::Json => {
                let doc = serde_json::json!({ "path": path.display().to_string() });
                Ok(format!("{}\n", serde_json::to_string(&doc)?))
            }
        },
    }
}

fn display(key: ConfigKey, value: &str) -> String {
    if key.is_secret() {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

fn key_value_json(key: ConfigKey, value: Option<&str>, pretty: bool) -> Result<String> {
    let doc = serde_json::json!({ "key": key.as_str(), "value": value });
    let rendered = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(format!("{rendered}\n"))
}
