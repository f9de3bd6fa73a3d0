//! CLI argument parsing and command dispatch.

pub mod args;
pub mod chat;
pub mod config;

pub use args::{ChatArgs, Cli, Commands, ConfigCommand, OutputFormat};
