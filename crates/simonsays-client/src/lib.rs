//! Client
//!
//! Client-side game session for the Simon Says protocol. A [`GameSession`]
//! owns one bidirectional [`Channel`] for exactly one game, turns domain
//! actions (join, press) into requests, and demultiplexes server responses
//! into [`SessionObserver`] callbacks.
//!
//! # Architecture
//!
//! The session never does I/O on its own. Outbound requests are handed to the
//! channel synchronously; inbound responses are pushed in by a single
//! consuming task ([`deliver`]) so turn-state transitions are strictly
//! ordered. The server is the only authority on game progress: the session
//! state exists to gate when a press is legal and to let renderers react to
//! phase changes.
//!
//! # Components
//!
//! - [`GameSession`]: Session state machine and request encoder
//! - [`transition`]: Pure turn-state transition function
//! - [`SessionObserver`]: Callback contract implemented by front-ends
//! - [`PlayerIdentity`]: Player identifier generation
//! - [`Channel`]: Outbound half of the transport collaborator
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::QuicChannel`]: [`Channel`] over one QUIC bidirectional stream
//! - [`transport::connect`]: Connect to a game server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod deliver;
mod error;
mod identity;
mod observer;
mod session;
mod state;

#[cfg(feature = "transport")]
pub mod transport;

pub use channel::{Channel, Inbound, StreamEnd};
pub use deliver::deliver;
pub use error::{Misuse, SessionError, TransportError};
pub use identity::{PLAYER_ID_PREFIX, PLAYER_NUMBER_RANGE, PlayerIdentity, generate_player_id};
pub use observer::{SessionEvent, SessionObserver};
pub use session::GameSession;
pub use simonsays_proto::{Color, PlayerId, ProtocolError, Request, Response, TurnState};
pub use state::{EndReason, SessionState, Transition, transition};
