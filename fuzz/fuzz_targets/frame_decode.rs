//! Fuzz target for Frame::decode and Response::from_frame
//!
//! Arbitrary bytes are fed through the streaming decoder exactly the way the
//! transport reader does. The decoder should NEVER panic: partial input
//! returns `None`, bad input returns an error.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use simonsays_proto::{Frame, Request, Response};

fuzz_target!(|data: &[u8]| {
    let mut buf = BytesMut::from(data);

    while let Ok(Some(frame)) = Frame::decode(&mut buf) {
        let _ = Response::from_frame(&frame);
        let _ = Request::from_frame(&frame);
    }
});
