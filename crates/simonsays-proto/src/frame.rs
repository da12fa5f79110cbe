//! Length-prefixed frames.
//!
//! A `Frame` is the transport unit on the game stream:
//!
//! `[opcode: u8] + [payload_len: u32 BE] + [payload: CBOR bytes]`
//!
//! Frames hold raw payload bytes. Typed access goes through
//! [`crate::Request`] and [`crate::Response`].

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{ProtocolError, Result};

/// Message type identifier.
///
/// Client → server opcodes live in `0x0_`, server → client in `0x1_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Join a game (client → server).
    Join = 0x01,
    /// Press a color (client → server).
    Press = 0x02,
    /// Turn-state change (server → client).
    Turn = 0x11,
    /// Light up a color (server → client).
    Lightup = 0x12,
}

impl Opcode {
    /// Parse a raw opcode byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Join),
            0x02 => Some(Self::Press),
            0x11 => Some(Self::Turn),
            0x12 => Some(Self::Lightup),
            _ => None,
        }
    }

    /// Raw opcode byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Complete protocol frame.
///
/// # Invariants
///
/// - `payload.len()` never exceeds [`Frame::MAX_PAYLOAD_SIZE`] once encoded;
///   oversized frames are rejected by [`Frame::encode`] and [`Frame::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    opcode: u8,
    /// Raw payload bytes (CBOR-encoded)
    pub payload: Bytes,
}

impl Frame {
    /// Size of the fixed frame prefix in bytes.
    pub const HEADER_SIZE: usize = 5;

    /// Maximum payload size (64 KiB). Game messages are tiny; anything larger
    /// is a broken or hostile peer.
    pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

    /// Create a frame for a known opcode.
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Self {
        Self { opcode: opcode.to_u8(), payload: payload.into() }
    }

    /// Create a frame with an arbitrary opcode byte.
    ///
    /// Used for forward-compatibility testing and by peers that speak a newer
    /// protocol revision.
    pub fn from_raw(opcode: u8, payload: impl Into<Bytes>) -> Self {
        Self { opcode, payload: payload.into() }
    }

    /// Raw opcode byte.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Opcode as enum. `None` for opcodes this build does not know.
    pub fn opcode_enum(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }

    /// Encode into `dst`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if the payload exceeds
    ///   [`Frame::MAX_PAYLOAD_SIZE`]
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        let len = self.payload.len();
        if len > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: len, max: Self::MAX_PAYLOAD_SIZE });
        }

        dst.put_u8(self.opcode);
        dst.put_u32(len as u32);
        dst.put_slice(&self.payload);
        Ok(())
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(Self::HEADER_SIZE + self.payload.len());
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode one frame from the front of a streaming buffer.
    ///
    /// Returns `Ok(None)` when `src` does not yet hold a complete frame; in
    /// that case `src` is left untouched. On success exactly one frame's bytes
    /// are consumed.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if the length prefix claims more than
    ///   [`Frame::MAX_PAYLOAD_SIZE`]. The stream cannot be resynchronized after
    ///   this.
    pub fn decode(src: &mut BytesMut) -> Result<Option<Self>> {
        if src.len() < Self::HEADER_SIZE {
            return Ok(None);
        }

        let opcode = src[0];
        let len = u32::from_be_bytes([src[1], src[2], src[3], src[4]]) as usize;
        if len > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: len, max: Self::MAX_PAYLOAD_SIZE });
        }

        let total = Self::HEADER_SIZE + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(total);
        frame.advance(Self::HEADER_SIZE);
        Ok(Some(Self { opcode, payload: frame.freeze() }))
    }
}
