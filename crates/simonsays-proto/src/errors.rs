//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while building, encoding, or decoding protocol messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload exceeds [`crate::Frame::MAX_PAYLOAD_SIZE`].
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual or claimed payload size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Opcode is not valid in this direction of the stream.
    #[error("unexpected opcode {opcode:#04x}")]
    UnexpectedOpcode {
        /// Raw opcode byte
        opcode: u8,
    },

    /// Sentinel color cannot be put on the wire.
    #[error("color {0} has no wire representation")]
    UnencodableColor(crate::Color),

    /// Player identifier failed validation.
    #[error("invalid player id: {reason}")]
    InvalidPlayerId {
        /// Why the identifier was rejected
        reason: &'static str,
    },

    /// CBOR encoding failed.
    #[error("CBOR encode failed: {0}")]
    CborEncode(String),

    /// CBOR decoding failed.
    #[error("CBOR decode failed: {0}")]
    CborDecode(String),
}
