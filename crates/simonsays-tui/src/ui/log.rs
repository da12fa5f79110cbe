//! Message log
//!
//! Most recent game messages, newest at the bottom.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{App, app::LogKind};

const BORDER_SIZE: u16 = 2;

/// Render the message log.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Messages ");

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = app.log().len().saturating_sub(visible_height);

    let items: Vec<ListItem> = app
        .log()
        .entries()
        .skip(skip)
        .map(|entry| {
            let style = match entry.kind {
                LogKind::Info => Style::default(),
                LogKind::Notice => Style::default().fg(Color::Yellow),
                LogKind::Warning => Style::default().fg(Color::Magenta),
            };
            ListItem::new(entry.text.clone()).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
