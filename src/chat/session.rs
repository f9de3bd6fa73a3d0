//! Session state: the transcript and the parameters of one chat session.
//!
//! The transcript always starts with exactly one system message. It only
//! grows, except for [`SessionState::clear`], which truncates it back to that
//! system message.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::endpoint::{ChatReply, ChatRequest};
use crate::error::Result;
use crate::storage::ResolvedChatConfig;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Short label used when rendering the transcript.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::User => "You",
            Self::Assistant => "AI",
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Cost reported by the backend. Only assistant messages carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Token count reported by the backend. Only assistant messages carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            cost: None,
            tokens: None,
        }
    }

    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant message built from an endpoint reply.
    #[must_use]
    pub fn assistant(reply: ChatReply) -> Self {
        Self {
            cost: reply.cost,
            tokens: reply.tokens,
            ..Self::new(Role::Assistant, reply.content)
        }
    }
}

/// Parameters fixed at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Kept for display. The outbound payload is the same either way.
    pub history_enabled: bool,
}

impl From<&ResolvedChatConfig> for SessionParams {
    fn from(resolved: &ResolvedChatConfig) -> Self {
        Self {
            model: resolved.model.clone(),
            temperature: resolved.temperature,
            max_tokens: resolved.max_tokens,
            system_prompt: resolved.system_prompt.clone(),
            history_enabled: resolved.history_enabled,
        }
    }
}

/// Aggregates computed from the transcript on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub model: String,
    pub temperature: f64,
    pub history_enabled: bool,
}

/// What the session amounted to, shown when it ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Messages excluding the system message.
    pub messages: usize,
    pub total_cost: f64,
    pub total_tokens: u64,
}

/// Transcript and parameters of one chat session.
#[derive(Debug, Clone)]
pub struct SessionState {
    params: SessionParams,
    transcript: Vec<Message>,
}

impl SessionState {
    /// Start a session with a transcript holding only the system prompt.
    #[must_use]
    pub fn new(params: SessionParams) -> Self {
        let transcript = vec![Message::system(params.system_prompt.clone())];
        Self { params, transcript }
    }

    /// Session parameters.
    #[must_use]
    pub const fn params(&self) -> &SessionParams {
        &self.params
    }

    /// The full transcript, system message first.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Everything after the system message.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.transcript[1..]
    }

    /// Number of transcript entries, including the system message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// True when nothing but the system message is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcript.len() <= 1
    }

    /// Append a user message and return the request that forwards it.
    pub fn push_user(&mut self, content: impl Into<String>) -> ChatRequest {
        let message = Message::user(content);
        let request = ChatRequest {
            model_id: self.params.model.clone(),
            message: message.content.clone(),
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        };
        self.transcript.push(message);
        request
    }

    /// Append the assistant message for a successful reply.
    pub fn push_assistant(&mut self, reply: ChatReply) -> &Message {
        self.transcript.push(Message::assistant(reply));
        &self.transcript[self.transcript.len() - 1]
    }

    /// Drop everything but the system message.
    pub fn clear(&mut self) {
        self.transcript.truncate(1);
    }

    /// Aggregate counts and totals.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        let count = |role: Role| self.transcript.iter().filter(|m| m.role == role).count();
        SessionStats {
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            total_cost: self.total_cost(),
            total_tokens: self.total_tokens(),
            model: self.params.model.clone(),
            temperature: self.params.temperature,
            history_enabled: self.params.history_enabled,
        }
    }

    /// Closing summary.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            messages: self.history().len(),
            total_cost: self.total_cost(),
            total_tokens: self.total_tokens(),
        }
    }

    fn total_cost(&self) -> f64 {
        self.transcript.iter().filter_map(|m| m.cost).sum()
    }

    fn total_tokens(&self) -> u64 {
        self.transcript.iter().filter_map(|m| m.tokens).sum()
    }

    /// Write the transcript as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written.
    pub fn save_transcript_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let transcript = TranscriptFile {
            version: 1,
            model: &self.params.model,
            messages: &self.transcript,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &transcript)?;
        tracing::debug!(?path, entries = self.transcript.len(), "Transcript saved");
        Ok(())
    }
}

#[derive(Serialize)]
struct TranscriptFile<'a> {
    version: u8,
    model: &'a str,
    messages: &'a [Message],
}
