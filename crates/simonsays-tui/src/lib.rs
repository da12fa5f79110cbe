//! Terminal front-end for Simon Says
//!
//! A thin shell over [`simonsays_client::GameSession`]. The [`App`] state
//! machine turns key presses and session events into [`AppAction`]s; the
//! [`runtime::Runtime`] executes them against the terminal and the session.
//!
//! Termination policy lives here: the session only reports that it ended, and
//! the front-end decides when to quit.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod app;
pub mod input;
pub mod link;
pub mod runtime;
pub mod terminal;
pub mod ui;

pub use app::{App, AppAction, AppEvent};
pub use input::KeyCommand;
pub use link::SessionLink;
pub use runtime::{Runtime, RuntimeConfig, RuntimeError};
pub use terminal::TerminalGuard;
