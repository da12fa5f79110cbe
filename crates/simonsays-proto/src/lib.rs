//! Simon Says wire model
//!
//! Typed messages exchanged on the single bidirectional game stream between a
//! player and the game server, plus the framing used to carry them.
//!
//! # Components
//!
//! - [`Color`] and [`TurnState`]: enumerations with an explicit sentinel for
//!   values outside the known set, so newer servers never break older clients.
//! - [`PlayerId`]: validated player identifier sent at join time.
//! - [`Request`] / [`Response`]: tagged unions for client → server and
//!   server → client traffic.
//! - [`Frame`]: `[opcode][length][CBOR payload]` transport unit.
//!
//! The opcode in the frame identifies the payload type, so the CBOR body never
//! carries a variant tag. Unknown server opcodes decode to
//! [`Response::Unknown`] instead of failing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
mod frame;
mod message;
mod types;

pub use errors::{ProtocolError, Result};
pub use frame::{Frame, Opcode};
pub use message::{Request, Response};
pub use types::{Color, PlayerId, TurnState};

/// ALPN protocol identifier negotiated by QUIC transports.
pub const ALPN_PROTOCOL: &[u8] = b"simonsays";
