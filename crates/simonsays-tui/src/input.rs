//! Key mapping
//!
//! Translates terminal keys into game commands. Colors are case-insensitive.

use crossterm::event::KeyCode;
use simonsays_client::Color;

/// Notice shown for keys that are not a color.
pub const UNRECOGNIZED_KEY_NOTICE: &str = "Unrecognized color, valid input [r,g,y,b]";

/// What a key press means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Press a color. May be [`Color::Unrecognized`] for other printable keys.
    Press(Color),
    /// Leave the game.
    Quit,
    /// Key with no meaning (arrows, function keys).
    Ignore,
}

impl KeyCommand {
    /// Map a terminal key.
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => Self::Quit,
            KeyCode::Char(c) => Self::Press(color_for_char(c)),
            _ => Self::Ignore,
        }
    }
}

/// Color selected by a character, [`Color::Unrecognized`] for anything else.
pub fn color_for_char(c: char) -> Color {
    match c.to_ascii_lowercase() {
        'r' => Color::Red,
        'g' => Color::Green,
        'b' => Color::Blue,
        'y' => Color::Yellow,
        _ => Color::Unrecognized,
    }
}
