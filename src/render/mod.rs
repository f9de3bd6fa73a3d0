//! Output rendering for the chat session, errors, and config commands.

pub mod chat;
pub mod config;
pub mod error;
pub mod spinner;

pub use config::render_config;
pub use error::{render_error, render_error_json};
pub use spinner::Spinner;
