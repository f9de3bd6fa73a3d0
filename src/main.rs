//! costlens - cost-tracking chat client
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use costlens::cli::{Cli, Commands};
use costlens::core::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_settings =
        logging::LogSettings::resolve(cli.log_level.as_deref(), cli.json_output, cli.verbose);
    logging::init(&log_settings);

    let format = cli.effective_format();
    let no_color = cli.no_color;
    let pretty = cli.pretty;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error_code = e.error_code(), "{}", e);
            let error_output = costlens::render::render_error(&e, format, no_color, pretty);
            eprintln!("{error_output}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> costlens::Result<()> {
    let format = cli.effective_format();
    let pretty = cli.pretty;
    let no_color = cli.no_color;

    match cli.command {
        None => {
            print_quickstart();
            Ok(())
        }

        Some(Commands::Chat(args)) => costlens::cli::chat::execute(&args, no_color).await,

        Some(Commands::Config(cmd)) => costlens::cli::config::execute(&cmd, format, pretty, no_color),
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r"costlens - Chat with models through a cost-tracking backend

USAGE:
    costlens [OPTIONS] <COMMAND>

COMMANDS:
    chat            Start an interactive chat session
    config          Read or change stored configuration

QUICK START:
    costlens config set api_key <KEY>                  # Store your API key
    costlens config set base_url https://host.example  # Point at your backend
    costlens chat                                      # Start chatting
    costlens chat --model gpt-4o --temperature 0.2     # Override per session

INSIDE A SESSION:
    help, clear, history, stats, quit

For more help: costlens --help
"
    );

    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
