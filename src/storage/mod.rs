//! Storage for configuration.

pub mod config;
pub mod paths;

pub use config::{
    ChatOverrides, Config, ConfigKey, ConfigSource, ConfigSources, ENV_API_KEY, ENV_BASE_URL,
    ENV_MODEL, ResolvedChatConfig,
};
pub use paths::{ENV_CONFIG, config_dir, config_file};
