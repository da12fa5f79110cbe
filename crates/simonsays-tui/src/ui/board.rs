//! Color board
//!
//! Four boxes, one per playable color. The lit color is filled.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color as TermColor, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use simonsays_client::Color;

use crate::App;

/// Board order, left to right.
const BOARD: [(Color, char); 4] =
    [(Color::Red, 'r'), (Color::Green, 'g'), (Color::Yellow, 'y'), (Color::Blue, 'b')];

/// Render the board.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((color, key), cell) in BOARD.iter().zip(columns.iter()) {
        let lit = app.lit_color() == Some(*color);
        render_box(frame, *color, *key, lit, *cell);
    }
}

fn render_box(frame: &mut Frame, color: Color, key: char, lit: bool, area: Rect) {
    let term_color = term_color(color);

    let (border_type, fill) = if lit {
        (BorderType::Thick, Style::default().bg(term_color).fg(TermColor::Black))
    } else {
        (BorderType::Plain, Style::default().fg(term_color))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(term_color))
        .title(format!(" {color} "));

    let label = Line::from(format!("[{key}]")).style(fill.add_modifier(Modifier::BOLD));
    let paragraph = Paragraph::new(label).alignment(Alignment::Center).style(fill).block(block);

    frame.render_widget(paragraph, area);
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Blue => TermColor::Blue,
        Color::Unrecognized => TermColor::DarkGray,
    }
}
