//! Fuzz target for frame length boundaries
//!
//! # Strategy
//!
//! - Length prefix: zero, small, at-max, just-over-max, `u32::MAX`, random
//! - Body: shorter than, equal to, or longer than the declared length
//!
//! # Invariants
//!
//! - Declared length over `Frame::MAX_PAYLOAD_SIZE` MUST be an error, even
//!   before the body arrives
//! - A short body MUST yield `None` and leave the buffer untouched
//! - A decoded frame MUST consume exactly header + declared length

#![no_main]

use arbitrary::Arbitrary;
use bytes::{BufMut, BytesMut};
use libfuzzer_sys::fuzz_target;
use simonsays_proto::{Frame, ProtocolError};

#[derive(Debug, Clone, Arbitrary)]
enum Length {
    Zero,
    Small(u8),
    AtMax,
    JustOverMax,
    MaxU32,
    Random(u32),
}

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryFrame {
    opcode: u8,
    length: Length,
    body: Vec<u8>,
}

fuzz_target!(|input: BoundaryFrame| {
    let max = Frame::MAX_PAYLOAD_SIZE as u32;
    let declared = match input.length {
        Length::Zero => 0,
        Length::Small(n) => u32::from(n),
        Length::AtMax => max,
        Length::JustOverMax => max + 1,
        Length::MaxU32 => u32::MAX,
        Length::Random(n) => n,
    };

    let mut buf = BytesMut::new();
    buf.put_u8(input.opcode);
    buf.put_u32(declared);
    buf.extend_from_slice(&input.body);
    let before = buf.len();

    match Frame::decode(&mut buf) {
        Ok(Some(frame)) => {
            assert!(declared <= max);
            assert_eq!(frame.payload.len(), declared as usize);
            assert_eq!(frame.opcode(), input.opcode);
            assert_eq!(before - buf.len(), Frame::HEADER_SIZE + declared as usize);
        },
        Ok(None) => {
            assert!(declared <= max);
            assert!(input.body.len() < declared as usize);
            assert_eq!(buf.len(), before);
        },
        Err(ProtocolError::PayloadTooLarge { .. }) => assert!(declared > max),
        Err(other) => panic!("unexpected decode error: {other}"),
    }
});
