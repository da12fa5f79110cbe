//! Session wiring
//!
//! [`SessionLink`] ties a [`GameSession`] to its delivery task and to the
//! connection underneath. Dropping the link stops both, so every early
//! return out of the runtime releases the connection.

use std::{sync::Arc, time::Duration};

use simonsays_client::{Channel, GameSession, Inbound, SessionError, SessionEvent, deliver};
use tokio::{sync::mpsc, task::JoinHandle};

/// Session whose observer forwards events to the runtime.
pub type ForwardingSession<C> = GameSession<C, mpsc::UnboundedSender<SessionEvent>>;

/// A running session plus the task delivering inbound items into it.
pub struct SessionLink<C: Channel + 'static> {
    session: Arc<ForwardingSession<C>>,
    delivery: JoinHandle<()>,
    stop: Box<dyn Fn() + Send + Sync>,
}

impl<C: Channel + 'static> SessionLink<C> {
    /// Open a session on `channel` and start delivering `inbound` into it.
    ///
    /// `stop` tears down the connection under `channel`. It runs when the
    /// link is dropped, and also when the session cannot be opened.
    /// Must be called from within a Tokio runtime.
    pub fn start(
        channel: C,
        inbound: mpsc::Receiver<Inbound>,
        events: mpsc::UnboundedSender<SessionEvent>,
        stop: impl Fn() + Send + Sync + 'static,
    ) -> Result<Self, SessionError> {
        let session = match GameSession::open(channel, events) {
            Ok(session) => Arc::new(session),
            Err(e) => {
                stop();
                return Err(e);
            },
        };

        let delivery = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { deliver(&*session, inbound).await })
        };

        Ok(Self { session, delivery, stop: Box::new(stop) })
    }

    /// The linked session.
    pub fn session(&self) -> &ForwardingSession<C> {
        &self.session
    }

    /// Close the session and give the server up to `grace` to complete the
    /// stream before the connection is stopped.
    pub async fn shutdown(mut self, grace: Duration) {
        self.session.close();

        if tokio::time::timeout(grace, &mut self.delivery).await.is_err() {
            tracing::debug!("server did not finish the stream in time");
        }
    }
}

impl<C: Channel + 'static> Drop for SessionLink<C> {
    fn drop(&mut self) {
        (self.stop)();
        self.delivery.abort();
    }
}
