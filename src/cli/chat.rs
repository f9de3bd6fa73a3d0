//! Chat command implementation.

use crate::chat::{ControllerOptions, SessionController, SessionParams, StdinLines};
use crate::cli::args::ChatArgs;
use crate::core::HttpChatEndpoint;
use crate::error::Result;
use crate::storage::{Config, ResolvedChatConfig};
use crate::util::env::{should_use_color, stderr_is_tty};

/// Execute the chat command.
///
/// Configuration is resolved and checked before stdin is opened or any
/// request is made.
///
/// # Errors
///
/// Returns a configuration error when the API key or base URL is missing or
/// a setting is invalid, or an I/O error if the transcript cannot be saved.
pub async fn execute(args: &ChatArgs, no_color: bool) -> Result<()> {
    let config = Config::load()?;
    let resolved = ResolvedChatConfig::resolve(&args.overrides(), &config)?;
    let endpoint_config = resolved.endpoint_config()?;

    tracing::debug!(
        ?endpoint_config,
        model = %resolved.model,
        model_source = %resolved.sources.model,
        api_key_source = %resolved.sources.api_key,
        base_url_source = %resolved.sources.base_url,
        history_enabled = resolved.history_enabled,
        "Starting chat session"
    );

    let endpoint = HttpChatEndpoint::new(endpoint_config)?;
    let options = ControllerOptions {
        color: should_use_color(no_color),
        spinner: stderr_is_tty(),
    };

    let outcome = SessionController::new(
        SessionParams::from(&resolved),
        endpoint,
        StdinLines::new(),
        std::io::stdout(),
    )
    .with_options(options)
    .run()
    .await;

    if let Some(path) = &args.save_transcript {
        outcome.state.save_transcript_to(path)?;
        eprintln!("Transcript saved to {}", path.display());
    }

    Ok(())
}
