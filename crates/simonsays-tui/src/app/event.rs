//! UI events
//!
//! Events fed into the App state machine from terminal input and the game
//! session.

use crossterm::event::KeyCode;
use simonsays_client::SessionEvent;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyCode),

    /// Periodic tick (lightup fade, press debounce).
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Join request was sent.
    Joined,

    /// Callback from the game session.
    Session(SessionEvent),

    /// A press was refused or failed to send.
    PressFailed {
        /// Human-readable reason.
        reason: String,
    },

    /// The game did not begin within the configured wait.
    WaitTimedOut,
}

impl From<SessionEvent> for AppEvent {
    fn from(event: SessionEvent) -> Self {
        Self::Session(event)
    }
}
