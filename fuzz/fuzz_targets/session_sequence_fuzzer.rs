//! Fuzz target for GameSession under arbitrary call sequences
//!
//! # Invariants
//!
//! - At most one `Join` is transmitted, never into a finished game, and it
//!   precedes every `Press`
//! - A `Press` is transmitted only while the session is `Started`
//! - `Finished` is terminal
//! - `on_session_ended` fires at most once
//! - Nothing reaches the observer after `close`

#![no_main]

use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simonsays_client::{
    Channel, Color, EndReason, GameSession, PlayerId, ProtocolError, Request, Response,
    SessionObserver, SessionState, StreamEnd, TransportError, TurnState,
};

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Join,
    Press(i32),
    Turn(i32),
    Lightup(i32),
    Unknown(u8),
    Malformed,
    StreamCompleted,
    StreamFailed,
    Close,
    BreakChannel,
}

#[derive(Default)]
struct Shared {
    sent: Vec<(Request, SessionState)>,
    broken: bool,
    ended: usize,
    after_close: usize,
    closed: bool,
}

struct FuzzChannel(Arc<Mutex<Shared>>, Arc<Mutex<SessionState>>);

impl Channel for FuzzChannel {
    fn is_ready(&self) -> bool {
        true
    }

    fn send(&mut self, request: Request) -> Result<(), TransportError> {
        let mut shared = self.0.lock().unwrap();
        if shared.broken {
            return Err(TransportError::Closed);
        }
        let state = *self.1.lock().unwrap();
        shared.sent.push((request, state));
        Ok(())
    }
}

struct FuzzObserver(Arc<Mutex<Shared>>);

impl FuzzObserver {
    fn record(&self) {
        let mut shared = self.0.lock().unwrap();
        if shared.closed {
            shared.after_close += 1;
        }
    }
}

impl SessionObserver for FuzzObserver {
    fn on_turn_changed(&mut self, _state: TurnState) {
        self.record();
    }

    fn on_lightup(&mut self, _color: Color) {
        self.record();
    }

    fn on_protocol_warning(&mut self, _message: &str) {
        self.record();
    }

    fn on_session_ended(&mut self, _reason: EndReason) {
        self.0.lock().unwrap().ended += 1;
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let shared = Arc::new(Mutex::new(Shared::default()));
    let mirror = Arc::new(Mutex::new(SessionState::NotStarted));
    let channel = FuzzChannel(Arc::clone(&shared), Arc::clone(&mirror));
    let session = GameSession::open(channel, FuzzObserver(Arc::clone(&shared))).unwrap();
    let player = PlayerId::new("Player-1").unwrap();

    let mut finished = false;
    for op in ops {
        *mirror.lock().unwrap() = session.state();
        match op {
            Op::Join => {
                let _ = session.join(&player);
            },
            Op::Press(c) => {
                let _ = session.send_color(Color::from_wire(c));
            },
            Op::Turn(t) => session.on_message(Response::Turn { state: TurnState::from_wire(t) }),
            Op::Lightup(c) => session.on_message(Response::Lightup { color: Color::from_wire(c) }),
            Op::Unknown(opcode) => session.on_message(Response::Unknown { opcode }),
            Op::Malformed => session.report_malformed(&ProtocolError::CborDecode("fuzz".into())),
            Op::StreamCompleted => session.on_stream_end(StreamEnd::Completed),
            Op::StreamFailed => {
                session.on_stream_end(StreamEnd::Failed(TransportError::Stream("fuzz".into())));
            },
            Op::Close => {
                session.close();
                shared.lock().unwrap().closed = true;
            },
            Op::BreakChannel => shared.lock().unwrap().broken = true,
        }

        if finished {
            assert_eq!(session.state(), SessionState::Finished);
        }
        finished = session.state() == SessionState::Finished;
    }

    let shared = shared.lock().unwrap();
    assert!(shared.ended <= 1);
    assert_eq!(shared.after_close, 0);

    let joins = shared.sent.iter().filter(|(r, _)| matches!(r, Request::Join { .. })).count();
    assert!(joins <= 1);
    if let Some((first, _)) = shared.sent.first() {
        assert!(matches!(first, Request::Join { .. }));
    }
    for (request, state) in &shared.sent {
        if let Request::Press { color } = request {
            assert_eq!(*state, SessionState::Started);
            assert!(color.is_recognized());
        }
        if let Request::Join { .. } = request {
            assert_ne!(*state, SessionState::Finished);
        }
    }
});
