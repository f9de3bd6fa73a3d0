//! Terminal rendering for the interactive chat session.
//!
//! Every function returns the text to print, newline-terminated, so the
//! controller decides where it goes and tests can inspect it directly.

use chrono::Local;
use colored::{ColoredString, Colorize};

use crate::chat::command::help_text;
use crate::chat::session::{Message, Role, SessionParams, SessionStats, SessionSummary};
use crate::error::CostlensError;
use crate::util::{format_cost, format_tokens};

fn paint(text: &str, color: bool, style: impl Fn(ColoredString) -> ColoredString) -> String {
    if color {
        style(text.normal()).to_string()
    } else {
        text.to_string()
    }
}

fn role_label(role: Role, color: bool) -> String {
    let label = format!("{}:", role.label());
    match role {
        Role::User => paint(&label, color, |s| s.cyan().bold()),
        Role::Assistant => paint(&label, color, |s| s.green().bold()),
        Role::System => paint(&label, color, |s| s.magenta().bold()),
    }
}

/// Greeting printed once before the first prompt.
#[must_use]
pub fn banner(params: &SessionParams, color: bool) -> String {
    format!(
        "{} (model: {}, temperature: {:.1})\nType 'help' for commands, 'quit' to exit.\n\n",
        paint("costlens chat", color, |s| s.bold()),
        params.model,
        params.temperature
    )
}

/// Input prompt (no trailing newline).
#[must_use]
pub fn prompt(color: bool) -> String {
    format!("{} ", role_label(Role::User, color))
}

/// Command reference.
#[must_use]
pub fn help(color: bool) -> String {
    let mut out = String::new();
    for (i, line) in help_text().lines().enumerate() {
        if i == 0 {
            out.push_str(&paint(line, color, |s| s.bold()));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Confirmation after `clear`.
#[must_use]
pub fn cleared(color: bool) -> String {
    format!("{}\n", paint("Conversation history cleared.", color, |s| s.yellow()))
}

fn cost_detail(message: &Message) -> Option<String> {
    match (message.cost, message.tokens) {
        (Some(cost), Some(tokens)) => Some(format!(
            "{}, {} tokens",
            format_cost(cost),
            format_tokens(tokens)
        )),
        (Some(cost), None) => Some(format_cost(cost)),
        (None, Some(tokens)) => Some(format!("{} tokens", format_tokens(tokens))),
        (None, None) => None,
    }
}

/// Transcript without the system message, oldest first.
#[must_use]
pub fn history(messages: &[Message], color: bool) -> String {
    if messages.is_empty() {
        return format!("{}\n", paint("No messages yet.", color, |s| s.dimmed()));
    }

    let mut out = format!("{}\n", paint("Conversation history:", color, |s| s.bold()));
    for message in messages {
        let time = message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();
        out.push_str(&format!(
            "[{}] {} {}",
            paint(&time, color, |s| s.dimmed()),
            role_label(message.role, color),
            message.content
        ));
        if let Some(cost) = message.cost {
            out.push_str(&paint(&format!(" ({})", format_cost(cost)), color, |s| s.dimmed()));
        }
        out.push('\n');
    }
    out
}

/// Aggregates for `stats`.
#[must_use]
pub fn stats(stats: &SessionStats, color: bool) -> String {
    let rows = [
        (
            "Messages",
            format!(
                "{} user, {} AI",
                stats.user_messages, stats.assistant_messages
            ),
        ),
        ("Total cost", format_cost(stats.total_cost)),
        ("Total tokens", stats.total_tokens.to_string()),
        ("Model", stats.model.clone()),
        ("Temperature", format!("{:.1}", stats.temperature)),
        (
            "History",
            if stats.history_enabled {
                "enabled".to_string()
            } else {
                "disabled".to_string()
            },
        ),
    ];

    let mut out = format!("{}\n", paint("Session statistics:", color, |s| s.bold()));
    for (label, value) in rows {
        out.push_str(&format!("  {:<14}{}\n", format!("{label}:"), value));
    }
    out
}

/// A successful model reply.
#[must_use]
pub fn assistant_reply(message: &Message, color: bool) -> String {
    let mut out = format!("{} {}\n", role_label(Role::Assistant, color), message.content);
    if let Some(detail) = cost_detail(message) {
        out.push_str(&paint(&format!("  [{detail}]"), color, |s| s.dimmed()));
        out.push('\n');
    }
    out
}

/// One-line notice for a failed turn.
#[must_use]
pub fn turn_failure(error: &CostlensError, color: bool) -> String {
    let reason = error.to_string().replace(['\r', '\n'], " ");
    format!(
        "{} {}\n",
        paint("Request failed:", color, |s| s.red().bold()),
        reason
    )
}

/// Notice for an unexpected error while handling a line.
#[must_use]
pub fn unexpected_error(color: bool) -> String {
    format!(
        "{}\n",
        paint(
            "Something went wrong handling that input. Please try again.",
            color,
            |s| s.red()
        )
    )
}

/// Closing summary.
#[must_use]
pub fn summary(summary: &SessionSummary, color: bool) -> String {
    format!(
        "\n{} {} messages, total cost {}\n",
        paint("Session ended:", color, |s| s.bold()),
        summary.messages,
        format_cost(summary.total_cost)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoint::ChatReply;

    fn stats_fixture() -> SessionStats {
        SessionStats {
            user_messages: 0,
            assistant_messages: 0,
            total_cost: 0.0,
            total_tokens: 0,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            history_enabled: true,
        }
    }

    #[test]
    fn plain_output_has_no_ansi() {
        let text = stats(&stats_fixture(), false);
        assert!(!text.contains("\x1b["));
        let text = help(false);
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn empty_stats_show_zeroes() {
        let text = stats(&stats_fixture(), false);
        assert!(text.contains("0 user, 0 AI"));
        assert!(text.contains("$0.0000"));
        assert!(text.contains("gpt-4o-mini"));
        assert!(text.contains("0.7"));
    }

    #[test]
    fn history_lists_roles_and_costs() {
        let messages = vec![
            Message::user("Hello"),
            Message::assistant(ChatReply {
                content: "Hi!".to_string(),
                cost: Some(0.002),
                tokens: Some(15),
            }),
        ];
        let text = history(&messages, false);
        assert!(text.contains("You: Hello"));
        assert!(text.contains("AI: Hi! ($0.0020)"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(history(&[], false), "No messages yet.\n");
    }

    #[test]
    fn reply_shows_cost_and_tokens_when_known() {
        let message = Message::assistant(ChatReply {
            content: "Hi!".to_string(),
            cost: Some(0.002),
            tokens: Some(1500),
        });
        let text = assistant_reply(&message, false);
        assert!(text.starts_with("AI: Hi!\n"));
        assert!(text.contains("$0.0020, 1.5K tokens"));

        let bare = Message::assistant(ChatReply {
            content: "ok".to_string(),
            cost: None,
            tokens: None,
        });
        assert_eq!(assistant_reply(&bare, false), "AI: ok\n");
    }

    #[test]
    fn failure_notice_is_single_line() {
        let err = CostlensError::Network("connection reset\nby peer".to_string());
        let text = turn_failure(&err, false);
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Request failed: network error"));
    }

    #[test]
    fn summary_reports_count_and_cost() {
        let text = summary(
            &SessionSummary {
                messages: 4,
                total_cost: 0.0123,
                total_tokens: 40,
            },
            false,
        );
        assert!(text.contains("4 messages"));
        assert!(text.contains("$0.0123"));
    }
}
