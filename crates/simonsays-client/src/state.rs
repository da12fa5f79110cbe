//! Turn-state machine.
//!
//! `NotStarted → Started → Finished`, driven only by server-sent
//! [`TurnState`] values. [`transition`] is a pure function so the full table
//! can be tested without a channel or observer.

use std::fmt;

use simonsays_proto::TurnState;

use crate::TransportError;

/// Derived session phase. Never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Joined (or about to), waiting for the server to begin the game.
    #[default]
    NotStarted,
    /// Game in progress; presses are legal.
    Started,
    /// Game won, lost, or the session was closed. Terminal.
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::Started => "started",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Stream completed gracefully or the session was closed locally.
    Normal,
    /// Server terminated the stream with an error.
    ServerError,
    /// Network or framing failure.
    TransportError,
}

impl From<&TransportError> for EndReason {
    fn from(error: &TransportError) -> Self {
        if error.is_server_initiated() { Self::ServerError } else { Self::TransportError }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Normal => "game over",
            Self::ServerError => "server error",
            Self::TransportError => "connection lost",
        };
        f.write_str(text)
    }
}

/// Outcome of feeding one turn value into the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Accept the value: move to `next` and notify the observer.
    Apply {
        /// State after the transition
        next: SessionState,
    },
    /// Accept silently. State unchanged, no callback.
    Ignore,
    /// Reject with a protocol warning. State unchanged.
    Warn(String),
}

/// Transition function for the turn-state machine.
///
/// | Current    | Turn value              | Result              |
/// |------------|-------------------------|---------------------|
/// | any        | unrecognized            | `Warn`              |
/// | NotStarted | BEGIN                   | `Apply(Started)`    |
/// | NotStarted | START/STOP_TURN, WIN/LOSE | `Warn`            |
/// | Started    | BEGIN (duplicate)       | `Ignore`            |
/// | Started    | START_TURN / STOP_TURN  | `Apply(Started)`    |
/// | Started    | WIN / LOSE              | `Apply(Finished)`   |
/// | Finished   | anything else           | `Ignore`            |
pub fn transition(current: SessionState, turn: TurnState) -> Transition {
    use SessionState::{Finished, NotStarted, Started};

    match (current, turn) {
        (_, TurnState::Unrecognized(raw)) => {
            Transition::Warn(format!("ignoring unrecognized turn state {raw}"))
        },
        (NotStarted, TurnState::Begin) => Transition::Apply { next: Started },
        (NotStarted, other) => Transition::Warn(format!("received {other} before the game began")),
        (Started, TurnState::Begin) | (Finished, _) => Transition::Ignore,
        (Started, TurnState::StartTurn | TurnState::StopTurn) => Transition::Apply { next: Started },
        (Started, TurnState::Win | TurnState::Lose) => Transition::Apply { next: Finished },
    }
}
