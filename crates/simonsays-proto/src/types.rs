//! Domain values carried on the game stream.

use std::fmt;

use crate::{ProtocolError, Result};

/// A button color.
///
/// Used both for the color a player presses and for the color the server
/// asks the client to light up. Wire numbering follows the game's proto:
/// RED=0, GREEN=1, YELLOW=2, BLUE=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red button.
    Red,
    /// Green button.
    Green,
    /// Blue button.
    Blue,
    /// Yellow button.
    Yellow,
    /// Input or wire value outside the known set. Never transmitted.
    Unrecognized,
}

impl Color {
    /// The four playable colors, in board order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Decode a wire value. Unknown numbers map to [`Color::Unrecognized`].
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Yellow,
            3 => Self::Blue,
            _ => Self::Unrecognized,
        }
    }

    /// Wire value for this color. `None` for the sentinel.
    pub fn wire_value(self) -> Option<i32> {
        match self {
            Self::Red => Some(0),
            Self::Green => Some(1),
            Self::Yellow => Some(2),
            Self::Blue => Some(3),
            Self::Unrecognized => None,
        }
    }

    /// Whether this is one of the four playable colors.
    pub fn is_recognized(self) -> bool {
        self != Self::Unrecognized
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Yellow => "YELLOW",
            Self::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(name)
    }
}

/// Server-asserted phase of the game.
///
/// The client never computes this locally; it only reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// Both players joined, the game begins.
    Begin,
    /// It is this player's turn.
    StartTurn,
    /// This player's turn is over, the opponent moves.
    StopTurn,
    /// This player won.
    Win,
    /// This player lost.
    Lose,
    /// Wire value this client does not know. Carries the raw number.
    Unrecognized(i32),
}

impl TurnState {
    /// Decode a wire value. Unknown numbers are preserved in
    /// [`TurnState::Unrecognized`].
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => Self::Begin,
            1 => Self::StartTurn,
            2 => Self::StopTurn,
            3 => Self::Win,
            4 => Self::Lose,
            other => Self::Unrecognized(other),
        }
    }

    /// Wire value for this state.
    pub fn wire_value(self) -> i32 {
        match self {
            Self::Begin => 0,
            Self::StartTurn => 1,
            Self::StopTurn => 2,
            Self::Win => 3,
            Self::Lose => 4,
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether this state ends the game.
    pub fn is_outcome(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => f.write_str("BEGIN"),
            Self::StartTurn => f.write_str("START_TURN"),
            Self::StopTurn => f.write_str("STOP_TURN"),
            Self::Win => f.write_str("WIN"),
            Self::Lose => f.write_str("LOSE"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

/// Opaque player identifier sent with the join request.
///
/// Uniqueness is probabilistic: two players picking the same identifier is
/// possible and shows up as a confusing session, not a protocol violation.
///
/// # Invariants
///
/// - Non-empty after trimming surrounding whitespace
/// - At most [`PlayerId::MAX_LEN`] bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// Maximum identifier length in bytes.
    pub const MAX_LEN: usize = 64;

    /// Validate and wrap an identifier. Surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ProtocolError::InvalidPlayerId { reason: "empty" });
        }
        if id.len() > Self::MAX_LEN {
            return Err(ProtocolError::InvalidPlayerId { reason: "longer than 64 bytes" });
        }
        Ok(Self(id.to_owned()))
    }

    /// Build `"{prefix}{number}"`.
    ///
    /// Leading whitespace of `prefix` is dropped and the prefix is truncated so
    /// the result always satisfies the length invariant. The number keeps the
    /// result non-empty.
    pub fn numbered(prefix: &str, number: u32) -> Self {
        const MAX_DIGITS: usize = 10;

        let prefix = prefix.trim_start();
        let mut end = prefix.len().min(Self::MAX_LEN - MAX_DIGITS);
        while !prefix.is_char_boundary(end) {
            end -= 1;
        }
        Self(format!("{}{number}", &prefix[..end]))
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
