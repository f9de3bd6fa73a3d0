//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::storage::ChatOverrides;

/// costlens - Chat with models through a cost-tracking backend.
#[derive(Parser, Debug)]
#[command(name = "costlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub const fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat(ChatArgs),

    /// Read or change stored configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `chat` command.
#[derive(Parser, Debug, Default)]
pub struct ChatArgs {
    /// Model to chat with
    #[arg(long, short = 'm', value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, short = 't', value_name = "T")]
    pub temperature: Option<f64>,

    /// System prompt for the session
    #[arg(long, short = 's', value_name = "PROMPT")]
    pub system: Option<String>,

    /// Mark the session as history-disabled
    #[arg(long)]
    pub no_history: bool,

    /// Maximum tokens per reply
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Write the transcript as JSON when the session ends
    #[arg(long, value_name = "PATH")]
    pub save_transcript: Option<PathBuf>,
}

impl ChatArgs {
    /// Session overrides taken from the command line.
    #[must_use]
    pub fn overrides(&self) -> ChatOverrides {
        ChatOverrides {
            model: self.model.clone(),
            temperature: self.temperature,
            system_prompt: self.system.clone(),
            max_tokens: self.max_tokens,
            no_history: self.no_history,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print one value
    Get {
        /// Key name (api_key, base_url, model, temperature, max_tokens)
        key: String,
    },

    /// Store a value
    Set {
        /// Key name
        key: String,
        /// New value
        value: String,
    },

    /// Restore a key to its default
    Unset {
        /// Key name
        key: String,
    },

    /// Show all values (API key masked)
    Show,

    /// Print the config file path
    Path,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_flags_become_overrides() {
        let cli = Cli::parse_from([
            "costlens",
            "chat",
            "--model",
            "claude-3-haiku",
            "--temperature",
            "0.2",
            "--system",
            "Be terse.",
            "--no-history",
            "--max-tokens",
            "256",
        ]);
        let Some(Commands::Chat(args)) = cli.command else {
            panic!("expected chat command");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.model.as_deref(), Some("claude-3-haiku"));
        assert_eq!(overrides.temperature, Some(0.2));
        assert_eq!(overrides.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(overrides.max_tokens, Some(256));
        assert!(overrides.no_history);
    }

    #[test]
    fn json_flag_wins_over_format() {
        let cli = Cli::parse_from(["costlens", "--json", "config", "show"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);

        let cli = Cli::parse_from(["costlens", "config", "path"]);
        assert_eq!(cli.effective_format(), OutputFormat::Human);
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::parse_from(["costlens", "config", "set", "base_url", "https://x.test"]);
        match cli.command {
            Some(Commands::Config(ConfigCommand::Set { key, value })) => {
                assert_eq!(key, "base_url");
                assert_eq!(value, "https://x.test");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
