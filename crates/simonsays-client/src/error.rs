//! Session and transport error types.

use simonsays_proto::Color;
use thiserror::Error;

use crate::SessionState;

/// Errors reported synchronously to the caller of a session operation.
///
/// None of these crash the session. Transport failures additionally end the
/// session and are reported once through
/// [`crate::SessionObserver::on_session_ended`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Channel was not ready when the session was opened.
    #[error("channel unavailable")]
    ChannelUnavailable,

    /// Caller violated the session contract.
    #[error("protocol misuse in {operation}: {reason}")]
    ProtocolMisuse {
        /// Operation that was attempted
        operation: &'static str,
        /// Contract rule that was violated
        reason: Misuse,
    },

    /// Caller tried to transmit a sentinel color.
    #[error("invalid color {0}: only RED, GREEN, BLUE and YELLOW can be pressed")]
    InvalidColor(Color),

    /// Channel failed while sending.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Returns true if the caller broke the session contract.
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::ProtocolMisuse { .. })
    }
}

/// Session contract rules a caller can break.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misuse {
    /// `join` was already called on this session.
    #[error("session already joined")]
    AlreadyJoined,

    /// A press was attempted before joining.
    #[error("session has not joined a game")]
    NotJoined,

    /// A press was attempted outside the `Started` state.
    #[error("game is not in progress (state: {0})")]
    NotStarted(SessionState),

    /// The server already decided the game.
    #[error("game is already over")]
    GameOver,

    /// The session was closed or its stream ended.
    #[error("session is closed")]
    Closed,
}

/// Transport failures surfaced by a [`crate::Channel`] or the inbound stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream read or write failed.
    #[error("stream error: {0}")]
    Stream(String),

    /// Peer sent bytes that cannot be framed.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Server terminated the stream with an error code.
    #[error("server error {code}: {reason}")]
    Server {
        /// Application error code sent by the server
        code: u64,
        /// Reason text sent by the server
        reason: String,
    },

    /// Channel is closed and cannot carry more requests.
    #[error("channel closed")]
    Closed,
}

impl TransportError {
    /// Returns true if the server, not the network, ended the stream.
    pub fn is_server_initiated(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misuse_is_distinguishable() {
        let err = SessionError::ProtocolMisuse { operation: "join", reason: Misuse::AlreadyJoined };
        assert!(err.is_misuse());
        assert!(!SessionError::InvalidColor(Color::Unrecognized).is_misuse());
        assert!(!SessionError::Transport(TransportError::Closed).is_misuse());
    }

    #[test]
    fn misuse_message_names_operation_and_state() {
        let err = SessionError::ProtocolMisuse {
            operation: "send_color",
            reason: Misuse::NotStarted(SessionState::Finished),
        };
        assert_eq!(
            err.to_string(),
            "protocol misuse in send_color: game is not in progress (state: finished)"
        );
    }

    #[test]
    fn only_server_errors_are_server_initiated() {
        assert!(TransportError::Server { code: 2, reason: "game over".into() }.is_server_initiated());
        assert!(!TransportError::Stream("reset".into()).is_server_initiated());
        assert!(!TransportError::Closed.is_server_initiated());
    }
}
