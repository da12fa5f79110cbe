//! UI actions
//!
//! Actions produced by the App state machine for the runtime to execute.

use simonsays_client::Color;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Send a color press to the server.
    Press(Color),
}
