//! Transport collaborator boundary.
//!
//! The session only needs to hand requests to an already-connected,
//! in-order, reliable channel and to be told what arrived on the other half.
//! Retry and deduplication are the transport's business.

use simonsays_proto::{ProtocolError, Request, Response};

use crate::{EndReason, TransportError};

/// Outbound half of a bidirectional game stream.
///
/// Sends are synchronous and must not block: implementations hand the request
/// to their own buffering and return.
pub trait Channel: Send {
    /// Whether the channel can carry a new session.
    fn is_ready(&self) -> bool;

    /// Hand a request to the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is disconnected.
    fn send(&mut self, request: Request) -> Result<(), TransportError>;

    /// Gracefully half-close the outbound side.
    ///
    /// Channels without half-close support keep the default no-op.
    fn finish(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// How the inbound stream terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// Server completed the stream.
    Completed,
    /// Stream failed.
    Failed(TransportError),
}

impl StreamEnd {
    /// Session end reason reported to the observer.
    pub fn reason(&self) -> EndReason {
        match self {
            Self::Completed => EndReason::Normal,
            Self::Failed(error) => EndReason::from(error),
        }
    }
}

/// One item on the inbound queue, in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Decoded server response.
    Message(Response),
    /// Frame with a known opcode whose payload failed to decode.
    Malformed(ProtocolError),
    /// Stream terminated. Consumers stop at the first one.
    Ended(StreamEnd),
}
