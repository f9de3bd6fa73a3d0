//! Busy indicator shown while a chat request is in flight.

use std::io::Write;

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

/// Spinner indicator for indeterminate progress.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    current: usize,
    label: Option<String>,
}

const UNICODE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

impl Spinner {
    /// Create a new spinner with default frames.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: UNICODE_FRAMES,
            current: 0,
            label: None,
        }
    }

    /// Create a spinner with a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Advance to the next frame.
    #[must_use]
    pub const fn tick(mut self) -> Self {
        self.current = (self.current + 1) % self.frames.len();
        self
    }

    /// Get the current frame.
    #[must_use]
    pub const fn frame(&self) -> &str {
        self.frames[self.current]
    }

    /// Current frame followed by the label.
    #[must_use]
    pub fn render(&self) -> String {
        self.label.as_ref().map_or_else(
            || self.frame().to_string(),
            |label| format!("{} {}", self.frame(), label),
        )
    }

    /// Redraw the spinner in place on the current terminal line.
    pub fn draw(&self, out: &mut impl Write) -> std::io::Result<()> {
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(self.render())
        )?;
        out.flush()
    }

    /// Erase the spinner line.
    pub fn clear(out: &mut impl Write) -> std::io::Result<()> {
        queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        out.flush()
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
