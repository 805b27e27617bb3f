//! Collaborators injected into an interactive session.
//!
//! The walker never touches stdin, stdout or the terminal directly. It reads
//! lines through a [`LineReader`], asks a [`Selector`] to choose from a list,
//! writes through a [`Console`] and optionally records values in a
//! [`HistoryStore`].

use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::history::HistoryStore;

/// Pulls one line of interactive input at a time.
pub trait LineReader {
    /// Returns the next line without its line terminator, `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the underlying stream fails.
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Chooses a single option out of a list.
pub trait Selector {
    /// Returns the chosen option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelectionAborted`] if the user cancelled the selection,
    /// [`Error::Selection`] for any other failure.
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<String>;
}

/// Output sink for prompts and messages.
pub trait Console {
    /// Plain text, used for prompts.
    fn print(&mut self, text: &str) -> Result<()>;

    /// Informational text.
    fn info(&mut self, text: &str) -> Result<()>;

    fn warn(&mut self, text: &str) -> Result<()>;

    /// The final invocation, visually distinct from everything else.
    fn highlight(&mut self, text: &str) -> Result<()>;
}

/// [`LineReader`] over any buffered reader, e.g. a locked stdin.
pub struct BufReadLines<R> {
    inner: R,
}

impl<R: BufRead> BufReadLines<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineReader for BufReadLines<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// [`Console`] without any styling, writing everything to `out`.
pub struct PlainConsole<W> {
    out: W,
}

impl<W: Write> PlainConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Console for PlainConsole<W> {
    fn print(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }

    fn info(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }

    fn warn(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }

    fn highlight(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }
}

/// The injected dependencies of one interactive run.
pub struct Session<'a> {
    pub(crate) reader: &'a mut dyn LineReader,
    pub(crate) selector: &'a mut dyn Selector,
    pub(crate) console: &'a mut dyn Console,
    pub(crate) history: Option<&'a mut dyn HistoryStore>,
}

impl<'a> Session<'a> {
    pub fn new(
        reader: &'a mut dyn LineReader,
        selector: &'a mut dyn Selector,
        console: &'a mut dyn Console,
    ) -> Self {
        Self {
            reader,
            selector,
            console,
            history: None,
        }
    }

    /// Enables history: values are offered from and recorded into `history`.
    #[must_use]
    pub fn with_history(mut self, history: &'a mut dyn HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Reads the next line, failing with [`Error::InputClosed`] at end of input.
    pub(crate) fn require_line(&mut self) -> Result<String> {
        self.reader.read_line()?.ok_or(Error::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_buf_read_lines_strips_terminators() {
        let mut reader = BufReadLines::new(Cursor::new("first\r\nsecond\n\nlast"));
        assert_eq!(reader.read_line().unwrap(), Some("first".to_string()));
        assert_eq!(reader.read_line().unwrap(), Some("second".to_string()));
        assert_eq!(reader.read_line().unwrap(), Some(String::new()));
        assert_eq!(reader.read_line().unwrap(), Some("last".to_string()));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_plain_console_collects_output() {
        let mut console = PlainConsole::new(Vec::new());
        console.print("a").unwrap();
        console.warn("b").unwrap();
        console.highlight("c").unwrap();
        assert_eq!(String::from_utf8(console.into_inner()).unwrap(), "abc");
    }
}
