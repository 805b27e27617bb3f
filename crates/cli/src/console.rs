//! Colourised terminal output for the interactive session.

use std::io::Write;

use cmd_walk_core::error::Result;
use cmd_walk_core::session::Console;
use crossterm::queue;
use crossterm::style::Color::{Cyan, Red, Reset, Yellow};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};

/// [`Console`] writing ANSI-styled text to `out`.
///
/// Prompts are plain, informational text is cyan, warnings red and the final
/// invocation bold yellow.
pub struct StyledConsole<W: Write> {
    out: W,
}

impl<W: Write> StyledConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_colored(&mut self, color: Color, bold: bool, text: &str) -> Result<()> {
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            SetForegroundColor(color),
            Print(text),
            SetForegroundColor(Reset),
            SetAttribute(Attribute::Reset),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Console for StyledConsole<W> {
    fn print(&mut self, text: &str) -> Result<()> {
        queue!(self.out, Print(text))?;
        self.out.flush()?;
        Ok(())
    }

    fn info(&mut self, text: &str) -> Result<()> {
        self.write_colored(Cyan, false, text)
    }

    fn warn(&mut self, text: &str) -> Result<()> {
        self.write_colored(Red, false, text)
    }

    fn highlight(&mut self, text: &str) -> Result<()> {
        self.write_colored(Yellow, true, text)
    }
}
