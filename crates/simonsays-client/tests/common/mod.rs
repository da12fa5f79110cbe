//! Test doubles shared by the session integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use simonsays_client::{
    Channel, Color, EndReason, GameSession, Request, SessionEvent, SessionObserver,
    TransportError, TurnState,
};

/// Everything a [`RecordingChannel`] saw.
#[derive(Debug, Default)]
pub struct Wire {
    pub sent: Vec<Request>,
    pub finishes: usize,
}

/// Channel that records requests instead of transmitting them.
pub struct RecordingChannel {
    pub wire: Arc<Mutex<Wire>>,
    pub fail_sends: bool,
}

impl RecordingChannel {
    pub fn new() -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        (Self { wire: Arc::clone(&wire), fail_sends: false }, wire)
    }
}

impl Channel for RecordingChannel {
    fn is_ready(&self) -> bool {
        true
    }

    fn send(&mut self, request: Request) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Closed);
        }
        self.wire.lock().unwrap().sent.push(request);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TransportError> {
        self.wire.lock().unwrap().finishes += 1;
        Ok(())
    }
}

/// Observer that records every callback in order.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingObserver {
    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl SessionObserver for RecordingObserver {
    fn on_turn_changed(&mut self, state: TurnState) {
        self.events.lock().unwrap().push(SessionEvent::TurnChanged(state));
    }

    fn on_lightup(&mut self, color: Color) {
        self.events.lock().unwrap().push(SessionEvent::Lightup(color));
    }

    fn on_protocol_warning(&mut self, message: &str) {
        self.events.lock().unwrap().push(SessionEvent::ProtocolWarning(message.to_owned()));
    }

    fn on_session_ended(&mut self, reason: EndReason) {
        self.events.lock().unwrap().push(SessionEvent::SessionEnded(reason));
    }
}

pub type TestSession = GameSession<RecordingChannel, RecordingObserver>;

/// Open a session over a recording channel.
pub fn open_session() -> (TestSession, Arc<Mutex<Wire>>, RecordingObserver) {
    let (channel, wire) = RecordingChannel::new();
    let observer = RecordingObserver::default();
    let session = GameSession::open(channel, observer.clone()).unwrap();
    (session, wire, observer)
}
