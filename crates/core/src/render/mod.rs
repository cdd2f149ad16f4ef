use std::io::Write;

use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{Clear, ClearType},
};

use crate::{analysis::Frame, Result};

/// Draws frames as rows of bar characters onto any writer. Production code
/// hands it a locked stdout, tests hand it a `Vec<u8>`.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Prints `height` rows top to bottom. A column shows `bar` on row `r` when
    /// its height is at least `r`, otherwise a space.
    pub fn print_frame(&mut self, frame: &Frame, height: u32, bar: char) -> Result<()> {
        let mut line = String::with_capacity(frame.len());
        for row in (1..=height).rev() {
            line.clear();
            for column in 0..frame.len() {
                line.push(if frame.reaches(column, row) { bar } else { ' ' });
            }
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Erases the `height` rows printed by the previous [`Self::print_frame`]
    /// call and leaves the cursor where that frame started.
    pub fn clear_frame(&mut self, height: u32) -> Result<()> {
        for _ in 0..height {
            queue!(self.out, MoveToPreviousLine(1), Clear(ClearType::UntilNewLine))?;
        }
        Ok(())
    }

    pub fn report_skipped(&mut self, skipped: usize) -> Result<()> {
        writeln!(self.out, "{skipped}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
