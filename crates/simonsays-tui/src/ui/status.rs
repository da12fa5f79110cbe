//! Status bar
//!
//! Displays the player, game phase and server.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    app::{Outcome, Phase},
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let phase = match (app.phase(), app.outcome()) {
        (Phase::Waiting, _) => Span::styled("Waiting", Style::default().fg(Color::Yellow)),
        (Phase::Playing, _) if app.is_my_turn() => Span::styled(
            "Your turn",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (Phase::Playing, _) => Span::styled("Opponent's turn", Style::default().fg(Color::Cyan)),
        (Phase::Finished, Some(Outcome::Won)) => Span::styled(
            "Won",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (Phase::Finished, Some(Outcome::Lost)) => {
            Span::styled("Lost", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        },
        (Phase::Finished, None) => Span::styled("Game over", Style::default().fg(Color::Red)),
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(app.player_id().to_owned(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        phase,
        Span::raw(format!(" | {} | q: quit", app.server_addr())),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
