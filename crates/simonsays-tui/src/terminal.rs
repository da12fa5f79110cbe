//! Terminal setup and teardown.
//!
//! [`TerminalGuard`] puts the terminal into raw mode on the alternate screen
//! and restores it on drop, including on early return through `?`.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{App, ui};

/// Raw-mode terminal that restores itself on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    ///
    /// If any step fails, the steps already taken are undone.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let entered = stdout().execute(EnterAlternateScreen).map(|_| ());
        undo_on_error(entered, || {
            let _ = disable_raw_mode();
        })?;

        let terminal = undo_on_error(Terminal::new(CrosstermBackend::new(stdout())), || {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;
        Ok(Self { terminal })
    }

    /// Draw the whole UI for `app`.
    pub fn draw(&mut self, app: &App) -> io::Result<()> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run `undo` if `result` is an error, then pass the result through.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn failed_step_runs_undo() {
        let undone = Cell::new(false);
        let result: io::Result<()> =
            undo_on_error(Err(io::Error::other("no terminal")), || undone.set(true));

        assert!(result.is_err());
        assert!(undone.get());
    }

    #[test]
    fn successful_step_keeps_state() {
        let undone = Cell::new(false);
        let result = undo_on_error(Ok(7), || undone.set(true));

        assert_eq!(result.unwrap(), 7);
        assert!(!undone.get());
    }
}
