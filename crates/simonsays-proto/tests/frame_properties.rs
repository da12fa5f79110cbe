//! Property-based tests for frame streaming and response decoding.
//!
//! The game stream delivers bytes in arbitrary chunks, so these tests check
//! that the streaming decoder reassembles the same message sequence no matter
//! where the chunk boundaries fall.

use bytes::BytesMut;
use proptest::prelude::*;
use simonsays_proto::{Color, Frame, Response, TurnState};

/// Strategy for responses a server can legally send.
fn arbitrary_response() -> impl Strategy<Value = Response> {
    prop_oneof![
        (-3i32..8).prop_map(|raw| Response::Turn { state: TurnState::from_wire(raw) }),
        prop::sample::select(Color::ALL.to_vec()).prop_map(|color| Response::Lightup { color }),
        (0x20u8..=0xFF).prop_map(|opcode| Response::Unknown { opcode }),
    ]
}

proptest! {
    #[test]
    fn chunked_stream_decodes_in_order(
        responses in prop::collection::vec(arbitrary_response(), 1..20),
        chunk in 1usize..16,
    ) {
        let mut wire = Vec::new();
        for response in &responses {
            let frame = response.to_frame().unwrap();
            wire.extend_from_slice(&frame.to_bytes().unwrap());
        }

        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        for piece in wire.chunks(chunk) {
            buf.extend_from_slice(piece);
            while let Some(frame) = Frame::decode(&mut buf).unwrap() {
                decoded.push(Response::from_frame(&frame).unwrap());
            }
        }

        prop_assert!(buf.is_empty());
        prop_assert_eq!(decoded, responses);
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut buf = BytesMut::from(&data[..]);
        while let Ok(Some(frame)) = Frame::decode(&mut buf) {
            let _ = Response::from_frame(&frame);
        }
    }
}
