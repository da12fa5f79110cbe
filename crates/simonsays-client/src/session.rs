//! Game session.
//!
//! Mediates all traffic on one channel for exactly one game. Outbound domain
//! actions and inbound server events share a single mutual-exclusion domain,
//! so a press racing a turn change always sees a consistent state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use simonsays_proto::{Color, PlayerId, ProtocolError, Request, Response, TurnState};

use crate::{
    Channel, EndReason, Misuse, SessionError, SessionObserver, SessionState, StreamEnd,
    Transition, transition,
};

/// Client side of one Simon Says game.
///
/// # Invariants
///
/// - At most one `Join` is ever transmitted, and it precedes every `Press`.
/// - A `Press` is only transmitted while the state is [`SessionState::Started`].
/// - State never moves backwards; [`SessionState::Finished`] is terminal.
/// - [`SessionObserver::on_session_ended`] fires at most once.
/// - After [`GameSession::close`], inbound messages never reach the observer.
pub struct GameSession<C, O> {
    inner: Mutex<Inner<C, O>>,
}

struct Inner<C, O> {
    channel: C,
    observer: O,
    state: SessionState,
    joined: bool,
    closed: bool,
    ended: bool,
}

impl<C: Channel, O: SessionObserver> GameSession<C, O> {
    /// Bind a session to an already-connected channel. Sends nothing.
    pub fn open(channel: C, observer: O) -> Result<Self, SessionError> {
        if !channel.is_ready() {
            tracing::warn!("channel not ready, refusing to open session");
            return Err(SessionError::ChannelUnavailable);
        }

        tracing::debug!("session opened");
        Ok(Self {
            inner: Mutex::new(Inner {
                channel,
                observer,
                state: SessionState::NotStarted,
                joined: false,
                closed: false,
                ended: false,
            }),
        })
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Whether the game is in progress.
    pub fn is_started(&self) -> bool {
        self.state() == SessionState::Started
    }

    /// Whether `join` has been called.
    pub fn has_joined(&self) -> bool {
        self.lock().joined
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Send the join request. At most once per session.
    pub fn join(&self, player: &PlayerId) -> Result<(), SessionError> {
        const OPERATION: &str = "join";

        let mut inner = self.lock();
        inner.ensure_open(OPERATION)?;
        if inner.joined {
            return Err(SessionError::ProtocolMisuse {
                operation: OPERATION,
                reason: Misuse::AlreadyJoined,
            });
        }
        if inner.state == SessionState::Finished {
            return Err(SessionError::ProtocolMisuse {
                operation: OPERATION,
                reason: Misuse::GameOver,
            });
        }

        inner.joined = true;
        tracing::info!(player = %player, "joining game");
        inner.transmit(Request::Join { player: player.clone() })
    }

    /// Send a color press. Only legal while the game is in progress.
    pub fn send_color(&self, color: Color) -> Result<(), SessionError> {
        const OPERATION: &str = "send_color";

        if !color.is_recognized() {
            return Err(SessionError::InvalidColor(color));
        }

        let mut inner = self.lock();
        inner.ensure_open(OPERATION)?;
        if !inner.joined {
            return Err(SessionError::ProtocolMisuse {
                operation: OPERATION,
                reason: Misuse::NotJoined,
            });
        }
        if inner.state != SessionState::Started {
            return Err(SessionError::ProtocolMisuse {
                operation: OPERATION,
                reason: Misuse::NotStarted(inner.state),
            });
        }

        tracing::info!(%color, "pressing color");
        inner.transmit(Request::Press { color })
    }

    /// Handle one inbound response.
    ///
    /// Called by the single consuming task for this session (see
    /// [`crate::deliver`]), never concurrently with itself.
    pub fn on_message(&self, response: Response) {
        let mut inner = self.lock();
        if inner.closed {
            tracing::debug!(?response, "session closed, dropping message");
            return;
        }

        match response {
            Response::Turn { state } => inner.apply_turn(state),
            Response::Lightup { color } => inner.lightup(color),
            Response::Unknown { opcode } => {
                inner.warn(&format!("ignoring message with unknown opcode {opcode:#04x}"));
            },
        }
    }

    /// Report a known message whose payload could not be decoded.
    pub fn report_malformed(&self, error: &ProtocolError) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.warn(&format!("ignoring malformed message: {error}"));
    }

    /// Handle termination of the inbound stream.
    pub fn on_stream_end(&self, end: StreamEnd) {
        let mut inner = self.lock();
        match &end {
            StreamEnd::Completed => tracing::info!("server completed the game stream"),
            StreamEnd::Failed(error) => tracing::warn!(%error, "game stream failed"),
        }

        inner.state = SessionState::Finished;
        inner.end(end.reason());
    }

    /// Close the session. Idempotent.
    ///
    /// Half-closes the channel, moves to [`SessionState::Finished`], and
    /// reports [`EndReason::Normal`] unless the session already ended.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }

        inner.closed = true;
        inner.state = SessionState::Finished;
        if let Err(error) = inner.channel.finish() {
            tracing::debug!(%error, "half-close failed");
        }

        tracing::debug!("session closed");
        inner.end(EndReason::Normal);
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C, O>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Channel, O: SessionObserver> Inner<C, O> {
    fn ensure_open(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.closed || self.ended {
            return Err(SessionError::ProtocolMisuse { operation, reason: Misuse::Closed });
        }
        Ok(())
    }

    fn transmit(&mut self, request: Request) -> Result<(), SessionError> {
        match self.channel.send(request) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "send failed, ending session");
                self.state = SessionState::Finished;
                self.end(EndReason::from(&error));
                Err(SessionError::Transport(error))
            },
        }
    }

    fn apply_turn(&mut self, turn: TurnState) {
        match transition(self.state, turn) {
            Transition::Apply { next } => {
                tracing::debug!(from = %self.state, to = %next, %turn, "turn state accepted");
                self.state = next;
                self.observer.on_turn_changed(turn);
            },
            Transition::Ignore => {
                tracing::debug!(state = %self.state, %turn, "turn state ignored");
            },
            Transition::Warn(message) => self.warn(&message),
        }
    }

    fn lightup(&mut self, color: Color) {
        if self.state == SessionState::Finished {
            tracing::debug!(%color, "game finished, ignoring lightup");
        } else if color.is_recognized() {
            self.observer.on_lightup(color);
        } else {
            self.warn("ignoring lightup with unrecognized color");
        }
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!(state = %self.state, "{message}");
        self.observer.on_protocol_warning(message);
    }

    fn end(&mut self, reason: EndReason) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.observer.on_session_ended(reason);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc;

    use super::*;
    use crate::{SessionEvent, TransportError};

    #[derive(Default)]
    struct Wire {
        sent: Vec<Request>,
        finishes: usize,
    }

    struct FakeChannel {
        wire: Arc<Mutex<Wire>>,
        ready: bool,
        fail_sends: bool,
    }

    impl Channel for FakeChannel {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn send(&mut self, request: Request) -> Result<(), TransportError> {
            if self.fail_sends {
                return Err(TransportError::Stream("broken pipe".into()));
            }
            self.wire.lock().unwrap().sent.push(request);
            Ok(())
        }

        fn finish(&mut self) -> Result<(), TransportError> {
            self.wire.lock().unwrap().finishes += 1;
            Ok(())
        }
    }

    type TestSession = GameSession<FakeChannel, mpsc::UnboundedSender<SessionEvent>>;

    fn session_with(
        fail_sends: bool,
    ) -> (TestSession, Arc<Mutex<Wire>>, mpsc::UnboundedReceiver<SessionEvent>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let channel = FakeChannel { wire: Arc::clone(&wire), ready: true, fail_sends };
        let (tx, rx) = mpsc::unbounded_channel();
        (GameSession::open(channel, tx).unwrap(), wire, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn player() -> PlayerId {
        PlayerId::new("Player-1").unwrap()
    }

    #[test]
    fn open_requires_ready_channel() {
        let channel = FakeChannel {
            wire: Arc::new(Mutex::new(Wire::default())),
            ready: false,
            fail_sends: false,
        };
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = GameSession::open(channel, tx);
        assert!(matches!(result, Err(SessionError::ChannelUnavailable)));
    }

    #[test]
    fn open_sends_nothing() {
        let (session, wire, _rx) = session_with(false);
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(wire.lock().unwrap().sent.is_empty());
    }

    #[test]
    fn second_join_is_misuse() {
        let (session, wire, _rx) = session_with(false);
        session.join(&player()).unwrap();

        let result = session.join(&player());
        assert!(matches!(
            result,
            Err(SessionError::ProtocolMisuse { reason: Misuse::AlreadyJoined, .. })
        ));
        assert_eq!(wire.lock().unwrap().sent, vec![Request::Join { player: player() }]);
    }

    #[test]
    fn press_before_join_is_misuse() {
        let (session, wire, _rx) = session_with(false);
        session.on_message(Response::Turn { state: TurnState::Begin });

        let result = session.send_color(Color::Red);
        assert!(matches!(
            result,
            Err(SessionError::ProtocolMisuse { reason: Misuse::NotJoined, .. })
        ));
        assert!(wire.lock().unwrap().sent.is_empty());
    }

    #[test]
    fn press_after_begin_is_sent() {
        let (session, wire, _rx) = session_with(false);
        session.join(&player()).unwrap();
        session.on_message(Response::Turn { state: TurnState::Begin });

        session.send_color(Color::Green).unwrap();
        assert_eq!(wire.lock().unwrap().sent.last(), Some(&Request::Press { color: Color::Green }));
    }

    #[test]
    fn sentinel_color_rejected_in_every_state() {
        let (session, wire, _rx) = session_with(false);
        assert_eq!(
            session.send_color(Color::Unrecognized),
            Err(SessionError::InvalidColor(Color::Unrecognized))
        );

        session.join(&player()).unwrap();
        session.on_message(Response::Turn { state: TurnState::Begin });
        assert_eq!(
            session.send_color(Color::Unrecognized),
            Err(SessionError::InvalidColor(Color::Unrecognized))
        );

        session.close();
        assert_eq!(
            session.send_color(Color::Unrecognized),
            Err(SessionError::InvalidColor(Color::Unrecognized))
        );
        assert_eq!(wire.lock().unwrap().sent.len(), 1, "only the join was transmitted");
    }

    #[test]
    fn close_is_idempotent() {
        let (session, wire, mut rx) = session_with(false);
        session.close();
        session.close();

        assert_eq!(wire.lock().unwrap().finishes, 1);
        assert_eq!(drain(&mut rx), vec![SessionEvent::SessionEnded(EndReason::Normal)]);
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn messages_after_close_are_dropped() {
        let (session, _wire, mut rx) = session_with(false);
        session.close();
        drain(&mut rx);

        session.on_message(Response::Turn { state: TurnState::Begin });
        session.on_message(Response::Lightup { color: Color::Red });
        session.on_message(Response::Unknown { opcode: 0x99 });
        session.on_stream_end(StreamEnd::Completed);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn operations_after_close_are_misuse() {
        let (session, wire, _rx) = session_with(false);
        session.close();

        assert!(matches!(
            session.join(&player()),
            Err(SessionError::ProtocolMisuse { reason: Misuse::Closed, .. })
        ));
        assert!(matches!(
            session.send_color(Color::Blue),
            Err(SessionError::ProtocolMisuse { reason: Misuse::Closed, .. })
        ));
        assert!(wire.lock().unwrap().sent.is_empty());
    }

    #[test]
    fn send_failure_ends_session_once() {
        let (session, _wire, mut rx) = session_with(true);

        let result = session.join(&player());
        assert!(matches!(result, Err(SessionError::Transport(TransportError::Stream(_)))));
        assert_eq!(session.state(), SessionState::Finished);

        session.close();
        session.on_stream_end(StreamEnd::Failed(TransportError::Closed));
        assert_eq!(drain(&mut rx), vec![SessionEvent::SessionEnded(EndReason::TransportError)]);
    }

    #[test]
    fn stream_end_reasons() {
        let cases = [
            (StreamEnd::Completed, EndReason::Normal),
            (
                StreamEnd::Failed(TransportError::Server { code: 3, reason: "bye".into() }),
                EndReason::ServerError,
            ),
            (StreamEnd::Failed(TransportError::Stream("reset".into())), EndReason::TransportError),
        ];

        for (end, expected) in cases {
            let (session, _wire, mut rx) = session_with(false);
            session.on_stream_end(end);
            assert_eq!(drain(&mut rx), vec![SessionEvent::SessionEnded(expected)]);
            assert_eq!(session.state(), SessionState::Finished);
        }
    }

    #[test]
    fn unknown_opcode_and_malformed_payload_warn() {
        let (session, _wire, mut rx) = session_with(false);
        session.on_message(Response::Unknown { opcode: 0x30 });
        session.report_malformed(&ProtocolError::CborDecode("truncated".into()));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, SessionEvent::ProtocolWarning(_))));
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[test]
    fn unrecognized_lightup_color_warns() {
        let (session, _wire, mut rx) = session_with(false);
        session.on_message(Response::Lightup { color: Color::Unrecognized });
        assert!(matches!(drain(&mut rx).as_slice(), [SessionEvent::ProtocolWarning(_)]));
    }
}
