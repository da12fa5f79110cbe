//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O).

mod board;
mod log;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const BOARD_MIN_HEIGHT: u16 = 5;
    const LOG_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(BOARD_MIN_HEIGHT),
            Constraint::Min(LOG_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [board_area, log_area, status_area] = chunks.as_ref() else {
        return;
    };

    board::render(frame, app, *board_area);
    log::render(frame, app, *log_area);
    status::render(frame, app, *status_area);
}
