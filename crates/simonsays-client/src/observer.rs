//! Session observer contract.

use simonsays_proto::{Color, TurnState};
use tokio::sync::mpsc;

use crate::EndReason;

/// Callbacks a [`crate::GameSession`] makes into its front-end.
///
/// Any renderer (terminal, mobile, headless test double) implements this; the
/// session never depends on a concrete renderer.
///
/// Callbacks run on the delivering context while the session is locked, in
/// stream order. Implementations must not call back into the same session
/// from a callback; hand the event off instead (the
/// [`mpsc::UnboundedSender`] implementation does exactly that).
pub trait SessionObserver: Send {
    /// Server changed the turn state and the session accepted it.
    fn on_turn_changed(&mut self, state: TurnState);

    /// Server asked to light up `color`.
    fn on_lightup(&mut self, color: Color);

    /// Server sent something this client does not understand. Non-fatal.
    fn on_protocol_warning(&mut self, message: &str);

    /// Session ended. Called at most once per session.
    fn on_session_ended(&mut self, reason: EndReason);
}

/// Observer callbacks as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// See [`SessionObserver::on_turn_changed`].
    TurnChanged(TurnState),
    /// See [`SessionObserver::on_lightup`].
    Lightup(Color),
    /// See [`SessionObserver::on_protocol_warning`].
    ProtocolWarning(String),
    /// See [`SessionObserver::on_session_ended`].
    SessionEnded(EndReason),
}

impl SessionObserver for mpsc::UnboundedSender<SessionEvent> {
    fn on_turn_changed(&mut self, state: TurnState) {
        forward(self, SessionEvent::TurnChanged(state));
    }

    fn on_lightup(&mut self, color: Color) {
        forward(self, SessionEvent::Lightup(color));
    }

    fn on_protocol_warning(&mut self, message: &str) {
        forward(self, SessionEvent::ProtocolWarning(message.to_owned()));
    }

    fn on_session_ended(&mut self, reason: EndReason) {
        forward(self, SessionEvent::SessionEnded(reason));
    }
}

fn forward(tx: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    if let Err(e) = tx.send(event) {
        tracing::debug!(event = ?e.0, "session event receiver dropped");
    }
}
