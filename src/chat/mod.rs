//! Interactive chat session.
//!
//! - [`command`] classifies input lines
//! - [`session`] owns the transcript
//! - [`controller`] runs the prompt/dispatch loop

pub mod command;
pub mod controller;
pub mod input;
pub mod session;

pub use command::{ChatCommand, classify, help_text};
pub use controller::{ControllerOptions, Flow, SessionController, SessionOutcome};
pub use input::{LineSource, StdinLines};
pub use session::{Message, Role, SessionParams, SessionState, SessionStats, SessionSummary};
