//! Where the config file lives.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use crate::util::env::non_empty_var;

/// Overrides the config file path.
pub const ENV_CONFIG: &str = "COSTLENS_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform config directory, or `~/.config/costlens` when the platform
/// lookup fails.
#[must_use]
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "costlens", "costlens").map_or_else(
        || {
            BaseDirs::new()
                .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf())
                .join(".config")
                .join("costlens")
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Config file path, honouring `COSTLENS_CONFIG`.
#[must_use]
pub fn config_file() -> PathBuf {
    non_empty_var(ENV_CONFIG).map_or_else(|| config_dir().join(CONFIG_FILE_NAME), PathBuf::from)
}
