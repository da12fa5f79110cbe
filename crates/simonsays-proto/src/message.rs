//! Typed requests and responses.
//!
//! Both directions are sum types. Each variant maps to exactly one
//! [`Opcode`], and only the inner fields are CBOR-encoded.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Color, Frame, Opcode, PlayerId, ProtocolError, Result, TurnState};

/// Client → server message.
///
/// Requests are fire-and-forget: none of them expects a correlated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Join a game as `player`.
    Join {
        /// Identifier of the joining player.
        player: PlayerId,
    },
    /// Press a color.
    Press {
        /// Color pressed.
        color: Color,
    },
}

/// Server → client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Turn-state change asserted by the server.
    Turn {
        /// New turn state.
        state: TurnState,
    },
    /// Light up a color on the client.
    Lightup {
        /// Color to display.
        color: Color,
    },
    /// Message with an opcode this client does not understand.
    Unknown {
        /// Raw opcode byte.
        opcode: u8,
    },
}

#[derive(Serialize, Deserialize)]
struct JoinPayload {
    player_id: String,
}

#[derive(Serialize, Deserialize)]
struct ColorPayload {
    color: i32,
}

#[derive(Serialize, Deserialize)]
struct TurnPayload {
    state: i32,
}

impl Request {
    /// Opcode for this request.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Join { .. } => Opcode::Join,
            Self::Press { .. } => Opcode::Press,
        }
    }

    /// Encode into a frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnencodableColor` for `Press { color: Unrecognized }`
    pub fn to_frame(&self) -> Result<Frame> {
        let payload = match self {
            Self::Join { player } => encode(&JoinPayload { player_id: player.as_str().to_owned() })?,
            Self::Press { color } => encode(&ColorPayload { color: encodable(*color)? })?,
        };
        Ok(Frame::new(self.opcode(), payload))
    }

    /// Decode a request frame (server side and test doubles).
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnexpectedOpcode` for non-request opcodes
    /// - `ProtocolError::CborDecode` for malformed payloads
    /// - `ProtocolError::InvalidPlayerId` for a join with an invalid id
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        match frame.opcode_enum() {
            Some(Opcode::Join) => {
                let payload: JoinPayload = decode(&frame.payload)?;
                Ok(Self::Join { player: PlayerId::new(payload.player_id)? })
            },
            Some(Opcode::Press) => {
                let payload: ColorPayload = decode(&frame.payload)?;
                Ok(Self::Press { color: Color::from_wire(payload.color) })
            },
            Some(Opcode::Turn | Opcode::Lightup) | None => {
                Err(ProtocolError::UnexpectedOpcode { opcode: frame.opcode() })
            },
        }
    }
}

impl Response {
    /// Encode into a frame (server side and test doubles).
    ///
    /// `Unknown` encodes as an empty frame carrying its raw opcode.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnencodableColor` for `Lightup { color: Unrecognized }`
    pub fn to_frame(&self) -> Result<Frame> {
        match self {
            Self::Turn { state } => {
                let payload = encode(&TurnPayload { state: state.wire_value() })?;
                Ok(Frame::new(Opcode::Turn, payload))
            },
            Self::Lightup { color } => {
                let payload = encode(&ColorPayload { color: encodable(*color)? })?;
                Ok(Frame::new(Opcode::Lightup, payload))
            },
            Self::Unknown { opcode } => Ok(Frame::from_raw(*opcode, Vec::new())),
        }
    }

    /// Decode a response frame.
    ///
    /// Opcodes this build does not know decode to [`Response::Unknown`]; unknown
    /// enum numbers inside known payloads decode to the sentinel values.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnexpectedOpcode` for client → server opcodes
    /// - `ProtocolError::CborDecode` for malformed payloads
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        match frame.opcode_enum() {
            Some(Opcode::Turn) => {
                let payload: TurnPayload = decode(&frame.payload)?;
                Ok(Self::Turn { state: TurnState::from_wire(payload.state) })
            },
            Some(Opcode::Lightup) => {
                let payload: ColorPayload = decode(&frame.payload)?;
                Ok(Self::Lightup { color: Color::from_wire(payload.color) })
            },
            Some(Opcode::Join | Opcode::Press) => {
                Err(ProtocolError::UnexpectedOpcode { opcode: frame.opcode() })
            },
            None => Ok(Self::Unknown { opcode: frame.opcode() }),
        }
    }
}

fn encodable(color: Color) -> Result<i32> {
    color.wire_value().ok_or(ProtocolError::UnencodableColor(color))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| ProtocolError::CborEncode(e.to_string()))?;
    Ok(buf)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_frame_carries_player_id() {
        let player = PlayerId::new("Player-123").unwrap();
        let frame = Request::Join { player: player.clone() }.to_frame().unwrap();
        assert_eq!(frame.opcode_enum(), Some(Opcode::Join));
        assert_eq!(Request::from_frame(&frame).unwrap(), Request::Join { player });
    }

    #[test]
    fn sentinel_color_is_never_encoded() {
        let press = Request::Press { color: Color::Unrecognized };
        assert_eq!(press.to_frame(), Err(ProtocolError::UnencodableColor(Color::Unrecognized)));

        let lightup = Response::Lightup { color: Color::Unrecognized };
        assert!(lightup.to_frame().is_err());
    }

    #[test]
    fn unknown_opcode_decodes_to_unknown_response() {
        let frame = Frame::from_raw(0x42, vec![0xFF]);
        assert_eq!(Response::from_frame(&frame).unwrap(), Response::Unknown { opcode: 0x42 });
    }

    #[test]
    fn request_opcode_is_rejected_as_response() {
        let frame = Request::Press { color: Color::Red }.to_frame().unwrap();
        assert_eq!(
            Response::from_frame(&frame),
            Err(ProtocolError::UnexpectedOpcode { opcode: Opcode::Press.to_u8() })
        );
    }

    #[test]
    fn unknown_turn_number_decodes_to_sentinel() {
        let payload = encode(&TurnPayload { state: 9 }).unwrap();
        let frame = Frame::new(Opcode::Turn, payload);
        assert_eq!(
            Response::from_frame(&frame).unwrap(),
            Response::Turn { state: TurnState::Unrecognized(9) }
        );
    }

    #[test]
    fn unknown_color_number_decodes_to_sentinel() {
        let payload = encode(&ColorPayload { color: 17 }).unwrap();
        let frame = Frame::new(Opcode::Lightup, payload);
        assert_eq!(
            Response::from_frame(&frame).unwrap(),
            Response::Lightup { color: Color::Unrecognized }
        );
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let frame = Frame::new(Opcode::Turn, vec![0xFF, 0x00, 0x13]);
        assert!(matches!(Response::from_frame(&frame), Err(ProtocolError::CborDecode(_))));
    }
}
