//! Session controller: the prompt/dispatch loop of an interactive chat.
//!
//! ```text
//! Starting -> Prompting -> Dispatching -> LocalHandling    -> Prompting
//!                                      -> AwaitingResponse -> Prompting
//!                                      -> Ending
//! ```
//!
//! `Starting` (configuration checks) happens before a controller exists, so a
//! controller always begins at the first prompt. The only suspension points
//! are reading a line and waiting for the endpoint, and neither overlaps the
//! other.

use std::any::Any;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;

use crate::chat::command::{ChatCommand, classify};
use crate::chat::input::LineSource;
use crate::chat::session::{SessionParams, SessionState, SessionSummary};
use crate::core::endpoint::{ChatEndpoint, ChatReply, ChatRequest};
use crate::error::Result;
use crate::render::chat as view;
use crate::render::spinner::Spinner;

const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Presentation switches for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Emit ANSI colors.
    pub color: bool,
    /// Show a busy indicator on stderr while waiting for a reply.
    pub spinner: bool,
}

/// What the loop does after handling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Final state handed back when a session ends.
#[derive(Debug)]
pub struct SessionOutcome<W> {
    pub state: SessionState,
    pub summary: SessionSummary,
    pub output: W,
}

/// Drives one interactive chat session.
pub struct SessionController<E, I, W> {
    endpoint: E,
    input: I,
    out: W,
    state: SessionState,
    options: ControllerOptions,
}

impl<E, I, W> SessionController<E, I, W>
where
    E: ChatEndpoint,
    I: LineSource,
    W: Write,
{
    /// Create a controller with a fresh transcript.
    pub fn new(params: SessionParams, endpoint: E, input: I, out: W) -> Self {
        Self {
            endpoint,
            input,
            out,
            state: SessionState::new(params),
            options: ControllerOptions::default(),
        }
    }

    /// Set presentation options.
    #[must_use]
    pub const fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run until the user exits or input ends, then print the summary.
    ///
    /// Per-turn failures never end the session, including a panic inside a
    /// turn. A panicked turn keeps its user message and nothing else. Input
    /// is released before this returns.
    pub async fn run(mut self) -> SessionOutcome<W> {
        let color = self.options.color;
        self.emit_or_log(&view::banner(self.state.params(), color));

        loop {
            if let Err(err) = self.emit(&view::prompt(color)) {
                tracing::warn!(error = %err, "Cannot write prompt; ending session");
                break;
            }

            let line = match self.input.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("End of input");
                    break;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Input read failed; ending session");
                    break;
                }
            };

            let handled = AssertUnwindSafe(self.handle_line(&line))
                .catch_unwind()
                .await;
            match handled {
                Ok(Ok(Flow::Continue)) => {}
                Ok(Ok(Flow::Exit)) => break,
                Ok(Err(err)) => {
                    tracing::error!(
                        error_code = err.error_code(),
                        error = %err,
                        "Unexpected error while handling input"
                    );
                    self.emit_or_log(&view::unexpected_error(color));
                }
                Err(payload) => {
                    if self.options.spinner {
                        Spinner::clear(&mut std::io::stderr()).ok();
                    }
                    tracing::error!(
                        panic = %panic_message(payload.as_ref()),
                        "Turn panicked; session continues"
                    );
                    self.emit_or_log(&view::unexpected_error(color));
                }
            }
        }

        let summary = self.state.summary();
        self.emit_or_log(&view::summary(&summary, color));
        tracing::info!(
            messages = summary.messages,
            total_cost = summary.total_cost,
            total_tokens = summary.total_tokens,
            "Chat session ended"
        );

        let Self { state, out, .. } = self;
        SessionOutcome {
            state,
            summary,
            output: out,
        }
    }

    /// Classify and handle one line of input.
    ///
    /// Empty input is a no-op. Endpoint failures are reported to the user and
    /// still return `Ok`.
    ///
    /// # Errors
    ///
    /// Returns error only if output cannot be written.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let Some(command) = classify(line) else {
            return Ok(Flow::Continue);
        };
        tracing::debug!(command = command.name(), "Dispatching input");

        let color = self.options.color;
        match command {
            ChatCommand::Exit => return Ok(Flow::Exit),
            ChatCommand::Help => self.emit(&view::help(color))?,
            ChatCommand::Clear => {
                self.state.clear();
                self.emit(&view::cleared(color))?;
            }
            ChatCommand::History => {
                let text = view::history(self.state.history(), color);
                self.emit(&text)?;
            }
            ChatCommand::Stats => {
                let text = view::stats(&self.state.stats(), color);
                self.emit(&text)?;
            }
            ChatCommand::Message(text) => self.chat_turn(text).await?,
        }
        Ok(Flow::Continue)
    }

    async fn chat_turn(&mut self, text: String) -> Result<()> {
        let color = self.options.color;
        let request = self.state.push_user(text);
        let started = Instant::now();

        match self.await_reply(&request).await {
            Ok(reply) => {
                tracing::debug!(
                    elapsed = ?started.elapsed(),
                    cost = reply.cost,
                    tokens = reply.tokens,
                    "Reply received"
                );
                let rendered = view::assistant_reply(self.state.push_assistant(reply), color);
                self.emit(&rendered)
            }
            Err(err) if err.is_turn_recoverable() => {
                tracing::warn!(
                    error_code = err.error_code(),
                    error = %err,
                    elapsed = ?started.elapsed(),
                    "Chat turn failed"
                );
                self.emit(&view::turn_failure(&err, color))
            }
            Err(err) => {
                tracing::error!(
                    error_code = err.error_code(),
                    error = %err,
                    "Endpoint returned an unexpected error"
                );
                self.emit(&view::unexpected_error(color))
            }
        }
    }

    async fn await_reply(&self, request: &ChatRequest) -> Result<ChatReply> {
        if !self.options.spinner {
            return self.endpoint.send(request).await;
        }

        let mut stderr = std::io::stderr();
        let mut spinner = Spinner::new().with_label("Thinking...");
        let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
        let send = self.endpoint.send(request);
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                result = &mut send => break result,
                _ = ticker.tick() => {
                    if let Err(err) = spinner.draw(&mut stderr) {
                        tracing::trace!(error = %err, "Spinner draw failed");
                    }
                    spinner = spinner.tick();
                }
            }
        };

        if let Err(err) = Spinner::clear(&mut stderr) {
            tracing::trace!(error = %err, "Spinner clear failed");
        }
        result
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn emit_or_log(&mut self, text: &str) {
        if let Err(err) = self.emit(text) {
            tracing::warn!(error = %err, "Failed to write session output");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CostlensError;
    use crate::test_utils::{MockEndpoint, ScriptedInput};

    fn params() -> SessionParams {
        SessionParams {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            system_prompt: "You are a helpful AI assistant.".to_string(),
            history_enabled: true,
        }
    }

    fn controller(
        endpoint: MockEndpoint,
        lines: &[&str],
    ) -> SessionController<MockEndpoint, ScriptedInput, Vec<u8>> {
        SessionController::new(params(), endpoint, ScriptedInput::new(lines), Vec::new())
    }

    #[tokio::test]
    async fn empty_line_changes_nothing() {
        let endpoint = MockEndpoint::new();
        let mut session = controller(endpoint.clone(), &[]);

        assert_eq!(session.handle_line("   ").await.unwrap(), Flow::Continue);
        assert_eq!(session.state().len(), 1);
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn exit_word_ends_loop_without_network() {
        let endpoint = MockEndpoint::new();
        let mut session = controller(endpoint.clone(), &[]);

        assert_eq!(session.handle_line("Bye").await.unwrap(), Flow::Exit);
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_message_only() {
        let endpoint = MockEndpoint::new();
        endpoint.push_error(CostlensError::Timeout(30));
        let mut session = controller(endpoint.clone(), &[]);

        assert_eq!(session.handle_line("Hello").await.unwrap(), Flow::Continue);
        assert_eq!(session.state().len(), 2);
        assert_eq!(session.state().stats().assistant_messages, 0);
    }

    #[tokio::test]
    async fn spinner_path_returns_reply() {
        let endpoint = MockEndpoint::new();
        endpoint.push_reply("Hi!", Some(0.002), Some(15));
        let mut session = controller(endpoint, &[]).with_options(ControllerOptions {
            color: false,
            spinner: true,
        });

        session.handle_line("Hello").await.unwrap();
        assert_eq!(session.state().len(), 3);
    }

    #[tokio::test]
    async fn non_recoverable_endpoint_error_gets_generic_notice() {
        let endpoint = MockEndpoint::new();
        endpoint.push_error(CostlensError::ConfigMissing {
            key: "api_key".to_string(),
        });
        endpoint.push_reply("Hi!", None, None);

        let outcome = controller(endpoint, &["Hello", "Again"]).run().await;
        let text = String::from_utf8(outcome.output).unwrap();

        assert!(text.contains(&view::unexpected_error(false)));
        assert!(!text.contains("Request failed"));
        assert_eq!(outcome.state.len(), 4);
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
