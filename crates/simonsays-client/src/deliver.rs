//! Inbound delivery loop.

use tokio::sync::mpsc;

use crate::{Channel, GameSession, Inbound, SessionObserver, StreamEnd, TransportError};

/// Feed inbound items into `session` in order until the stream ends.
///
/// This is the single consuming task for a session; running two of these
/// against the same session breaks turn ordering. Returns after the stream
/// end has been delivered. A queue that closes without an explicit end is
/// reported as a stream failure.
pub async fn deliver<C, O>(session: &GameSession<C, O>, mut inbound: mpsc::Receiver<Inbound>)
where
    C: Channel,
    O: SessionObserver,
{
    while let Some(item) = inbound.recv().await {
        match item {
            Inbound::Message(response) => session.on_message(response),
            Inbound::Malformed(error) => session.report_malformed(&error),
            Inbound::Ended(end) => {
                session.on_stream_end(end);
                return;
            },
        }
    }

    tracing::debug!("inbound queue closed without stream end");
    session.on_stream_end(StreamEnd::Failed(TransportError::Stream(
        "inbound queue closed".to_owned(),
    )));
}
