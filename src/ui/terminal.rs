use std::io::{self, Stdout, Write};

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::Print,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Alternate-screen session for the chat view.
///
/// Raw mode stays off: input is read line by line from stdin, so the
/// terminal keeps its own echo and line editing.
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    pub fn new() -> Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self { stdout })
    }

    /// Replaces the whole screen with `lines` and leaves the cursor below them.
    pub fn draw(&mut self, lines: &[String]) -> Result<()> {
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in lines {
            queue!(self.stdout, Print(line), Print("\r\n"))?;
        }
        self.stdout.flush()?;
        Ok(())
    }

    pub fn width() -> usize {
        crossterm::terminal::size()
            .map(|(columns, _)| usize::from(columns))
            .unwrap_or(80)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen);
    }
}
