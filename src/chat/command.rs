//! Built-in command classification for the chat session.
//!
//! Every input line is either a built-in command, handled locally, or a
//! message forwarded to the model.

/// A classified line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// End the session.
    Exit,
    /// Show the command reference.
    Help,
    /// Reset the transcript to the system message.
    Clear,
    /// Show the conversation so far.
    History,
    /// Show counts and totals.
    Stats,
    /// Anything else: send to the model. Original casing is preserved.
    Message(String),
}

impl ChatCommand {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Help => "help",
            Self::Clear => "clear",
            Self::History => "history",
            Self::Stats => "stats",
            Self::Message(_) => "message",
        }
    }
}

/// Classifies one line of input.
///
/// Matching is case-insensitive after trimming. Returns `None` for empty or
/// whitespace-only input, which must neither touch the transcript nor reach
/// the network.
///
/// # Examples
///
/// ```
/// # use costlens::chat::{ChatCommand, classify};
/// assert_eq!(classify("  QUIT "), Some(ChatCommand::Exit));
/// assert_eq!(classify("Stats"), Some(ChatCommand::Stats));
/// assert_eq!(classify("   "), None);
/// assert_eq!(
///     classify("Hello there"),
///     Some(ChatCommand::Message("Hello there".to_string()))
/// );
/// ```
#[must_use]
pub fn classify(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let command = match trimmed.to_lowercase().as_str() {
        "quit" | "exit" | "bye" | "q" => ChatCommand::Exit,
        "help" => ChatCommand::Help,
        "clear" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "stats" => ChatCommand::Stats,
        _ => ChatCommand::Message(trimmed.to_string()),
    };
    Some(command)
}

/// Returns help text describing available commands.
#[must_use]
pub const fn help_text() -> &'static str {
    r"Available commands:
  help                  Show this help message
  clear                 Clear the conversation (keeps the system prompt)
  history               Show the conversation so far
  stats                 Show message counts, total cost and tokens
  quit, exit, bye, q    End the session
Anything else is sent to the model."
}
