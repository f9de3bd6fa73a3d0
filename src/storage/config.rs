//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/costlens/config.toml`
//! - macOS: `~/Library/Application Support/dev.costlens.costlens/config.toml`
//! - Windows: `%APPDATA%/costlens/costlens/config/config.toml`
//!
//! The store is a flat key/value table exposed through [`Config::get`] and
//! [`Config::set`]; the `config` subcommand is a thin shell around them.
//!
//! ## Precedence
//!
//! Chat settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `COSTLENS_API_KEY`: API key sent as a bearer token
//! - `COSTLENS_BASE_URL`: Backend base URL
//! - `COSTLENS_MODEL`: Default model identifier
//! - `COSTLENS_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths;
use crate::core::endpoint::EndpointConfig;
use crate::error::{CostlensError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "COSTLENS_API_KEY";
/// Environment variable for the backend base URL.
pub const ENV_BASE_URL: &str = "COSTLENS_BASE_URL";
/// Environment variable for the default model.
pub const ENV_MODEL: &str = "COSTLENS_MODEL";

// =============================================================================
// Defaults
// =============================================================================

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Sampling temperature used when nothing else is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Maximum response tokens used when nothing else is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// System prompt seeded into every new transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

// =============================================================================
// Keys
// =============================================================================

/// A key understood by the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiKey,
    BaseUrl,
    Model,
    Temperature,
    MaxTokens,
}

impl ConfigKey {
    /// All keys, in display order.
    pub const ALL: &'static [Self] = &[
        Self::ApiKey,
        Self::BaseUrl,
        Self::Model,
        Self::Temperature,
        Self::MaxTokens,
    ];

    /// Parse a key name.
    ///
    /// Accepts `snake_case`, `kebab-case` and `camelCase` spellings.
    ///
    /// # Errors
    ///
    /// Returns [`CostlensError::UnknownConfigKey`] for anything else.
    pub fn from_arg(name: &str) -> Result<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "apikey" => Ok(Self::ApiKey),
            "baseurl" => Ok(Self::BaseUrl),
            "model" => Ok(Self::Model),
            "temperature" => Ok(Self::Temperature),
            "maxtokens" => Ok(Self::MaxTokens),
            _ => Err(CostlensError::UnknownConfigKey(name.to_string())),
        }
    }

    /// Canonical key name as written in the config file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::BaseUrl => "base_url",
            Self::Model => "model",
            Self::Temperature => "temperature",
            Self::MaxTokens => "max_tokens",
        }
    }

    /// Whether the value should be masked when displayed.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::ApiKey)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Persisted application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key sent as a bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Backend base URL (scheme and host, no trailing path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Default model identifier.
    pub model: String,
    /// Default sampling temperature.
    pub temperature: f64,
    /// Maximum tokens per response.
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| CostlensError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CostlensError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        tracing::debug!(?path, "Config file saved");
        Ok(())
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_file()
    }

    /// Read a value as its display string. `None` means "not set".
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::ApiKey => self.api_key.clone(),
            ConfigKey::BaseUrl => self.base_url.clone(),
            ConfigKey::Model => Some(self.model.clone()),
            ConfigKey::Temperature => Some(self.temperature.to_string()),
            ConfigKey::MaxTokens => Some(self.max_tokens.to_string()),
        }
    }

    /// Parse, validate, and store a value.
    ///
    /// # Errors
    ///
    /// Returns [`CostlensError::ConfigInvalid`] if the value does not parse or
    /// is out of range. The config is left untouched on error.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        let invalid = |message: &str| CostlensError::ConfigInvalid {
            key: key.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        };

        match key {
            ConfigKey::ApiKey => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.api_key = Some(value.to_string());
            }
            ConfigKey::BaseUrl => {
                self.base_url = Some(validate_base_url(value).map_err(|m| invalid(&m))?);
            }
            ConfigKey::Model => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.model = value.to_string();
            }
            ConfigKey::Temperature => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| invalid("expected a number between 0.0 and 2.0"))?;
                self.temperature =
                    validate_temperature(parsed).map_err(|m| invalid(&m))?;
            }
            ConfigKey::MaxTokens => {
                let parsed: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a positive integer"))?;
                if parsed == 0 {
                    return Err(invalid("must be greater than 0"));
                }
                self.max_tokens = parsed;
            }
        }
        Ok(())
    }

    /// Restore a key to its built-in default.
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        match key {
            ConfigKey::ApiKey => self.api_key = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Model => self.model = defaults.model,
            ConfigKey::Temperature => self.temperature = defaults.temperature,
            ConfigKey::MaxTokens => self.max_tokens = defaults.max_tokens,
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - Temperature is within 0.0-2.0
    /// - Max tokens is positive
    /// - Base URL, if set, is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        validate_temperature(self.temperature).map_err(|message| {
            CostlensError::ConfigInvalid {
                key: ConfigKey::Temperature.to_string(),
                value: self.temperature.to_string(),
                message,
            }
        })?;

        if self.max_tokens == 0 {
            return Err(CostlensError::ConfigInvalid {
                key: ConfigKey::MaxTokens.to_string(),
                value: "0".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if let Some(url) = &self.base_url {
            validate_base_url(url).map_err(|message| CostlensError::ConfigInvalid {
                key: ConfigKey::BaseUrl.to_string(),
                value: url.clone(),
                message,
            })?;
        }

        Ok(())
    }
}

fn validate_temperature(value: f64) -> std::result::Result<f64, String> {
    if value.is_finite() && TEMPERATURE_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err("must be between 0.0 and 2.0".to_string())
    }
}

fn validate_base_url(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_string()),
        _ => Err("expected an http:// or https:// URL".to_string()),
    }
}

// =============================================================================
// Resolved Chat Configuration
// =============================================================================

/// Chat settings given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ChatOverrides {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub no_history: bool,
}

/// Fully resolved chat settings after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedChatConfig {
    /// API key, if configured anywhere.
    pub api_key: Option<String>,
    /// Backend base URL, if configured anywhere.
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens per response.
    pub max_tokens: u32,
    /// System prompt seeded into the transcript.
    pub system_prompt: String,
    /// Whether conversation history is enabled.
    pub history_enabled: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub api_key: ConfigSource,
    pub base_url: ConfigSource,
    pub model: ConfigSource,
    pub temperature: ConfigSource,
    pub max_tokens: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedChatConfig {
    /// Resolve chat settings from CLI overrides, the process environment, and
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if an override or environment value is invalid.
    pub fn resolve(overrides: &ChatOverrides, config: &Config) -> Result<Self> {
        Self::resolve_with_env(overrides, config, crate::util::env::non_empty_var)
    }

    /// Resolve chat settings with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if an override or environment value is invalid.
    pub fn resolve_with_env<F>(overrides: &ChatOverrides, config: &Config, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sources = ConfigSources::default();

        let api_key = resolve_optional(
            env(ENV_API_KEY),
            config.api_key.clone(),
            &mut sources.api_key,
        );

        let base_url = match resolve_optional(
            env(ENV_BASE_URL),
            config.base_url.clone(),
            &mut sources.base_url,
        ) {
            Some(url) => Some(validate_base_url(&url).map_err(|message| {
                CostlensError::ConfigInvalid {
                    key: ConfigKey::BaseUrl.to_string(),
                    value: url.clone(),
                    message,
                }
            })?),
            None => None,
        };

        let model = if let Some(model) = overrides.model.clone() {
            sources.model = ConfigSource::Cli;
            model
        } else if let Some(model) = env(ENV_MODEL) {
            sources.model = ConfigSource::Env;
            model
        } else {
            sources.model = source_for(&config.model, DEFAULT_MODEL);
            config.model.clone()
        };

        let temperature = if let Some(value) = overrides.temperature {
            sources.temperature = ConfigSource::Cli;
            validate_temperature(value).map_err(|message| CostlensError::ConfigInvalid {
                key: ConfigKey::Temperature.to_string(),
                value: value.to_string(),
                message,
            })?
        } else {
            sources.temperature = if (config.temperature - DEFAULT_TEMPERATURE).abs() > f64::EPSILON
            {
                ConfigSource::ConfigFile
            } else {
                ConfigSource::Default
            };
            config.temperature
        };

        let max_tokens = match overrides.max_tokens {
            Some(0) => {
                return Err(CostlensError::ConfigInvalid {
                    key: ConfigKey::MaxTokens.to_string(),
                    value: "0".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            Some(value) => {
                sources.max_tokens = ConfigSource::Cli;
                value
            }
            None => {
                sources.max_tokens = if config.max_tokens == DEFAULT_MAX_TOKENS {
                    ConfigSource::Default
                } else {
                    ConfigSource::ConfigFile
                };
                config.max_tokens
            }
        };

        let system_prompt = overrides
            .system_prompt
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
            system_prompt,
            history_enabled: !overrides.no_history,
            sources,
        })
    }

    /// Endpoint connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`CostlensError::ConfigMissing`] when the API key or base URL
    /// is absent. This check runs before any network activity.
    pub fn endpoint_config(&self) -> Result<EndpointConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| CostlensError::ConfigMissing {
                key: ConfigKey::ApiKey.to_string(),
            })?;
        let base_url = self
            .base_url
            .clone()
            .ok_or_else(|| CostlensError::ConfigMissing {
                key: ConfigKey::BaseUrl.to_string(),
            })?;
        Ok(EndpointConfig::new(base_url, api_key))
    }
}

fn resolve_optional(
    env_value: Option<String>,
    file_value: Option<String>,
    source: &mut ConfigSource,
) -> Option<String> {
    if let Some(value) = env_value {
        *source = ConfigSource::Env;
        return Some(value);
    }
    if let Some(value) = file_value.filter(|v| !v.trim().is_empty()) {
        *source = ConfigSource::ConfigFile;
        return Some(value);
    }
    *source = ConfigSource::Default;
    None
}

fn source_for(value: &str, default: &str) -> ConfigSource {
    if value == default {
        ConfigSource::Default
    } else {
        ConfigSource::ConfigFile
    }
}
