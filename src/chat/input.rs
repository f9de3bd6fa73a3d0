//! Line input for the chat session.

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::Result;

/// A source of input lines.
///
/// Reading a line is the only point where the session waits on the user.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Reads lines from the process's standard input.
pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    /// Wrap standard input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}
