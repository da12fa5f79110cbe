//! Async runtime
//!
//! Event loop that drives terminal I/O and the game session. Uses
//! `tokio::select!` over terminal events, session events, a redraw tick and an
//! optional wait timeout. Inbound delivery runs on its own task so turn
//! ordering never depends on the UI loop.

use std::{io, time::Duration};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use simonsays_client::{
    PlayerIdentity, SessionError, SessionEvent, TransportError,
    transport::{self, QuicChannel, TransportConfig},
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    App,
    app::{AppAction, AppEvent},
    link::SessionLink,
    terminal::TerminalGuard,
};

/// Redraw and animation tick.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait for the server to complete the stream after closing.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Could not reach the game server.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session refused an operation.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Server address (host:port).
    pub server_addr: String,
    /// QUIC connection settings.
    pub transport: TransportConfig,
    /// Quit if the game has not begun within this long.
    pub wait_timeout: Option<Duration>,
}

/// Async runtime for the TUI.
///
/// Owns the terminal, the [`App`] state machine and one game session.
pub struct Runtime {
    terminal: TerminalGuard,
    app: App,
    identity: PlayerIdentity,
    link: SessionLink<QuicChannel>,
    session_events: mpsc::UnboundedReceiver<SessionEvent>,
    wait_timeout: Option<Duration>,
}

impl Runtime {
    /// Connect to the server and take over the terminal.
    ///
    /// Connection failures are reported before the terminal is touched. The
    /// connection is stopped again if the terminal cannot be set up.
    pub async fn connect(
        identity: PlayerIdentity,
        config: RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        let (channel, inbound) = transport::connect(&config.server_addr, &config.transport).await?;
        let stop = channel.stop_handle();

        let (events_tx, session_events) = mpsc::unbounded_channel();
        let link = SessionLink::start(channel, inbound, events_tx, move || stop.stop())?;

        let terminal = TerminalGuard::enter()?;
        let app = App::new(identity.player_id().as_str(), config.server_addr);

        Ok(Self {
            terminal,
            app,
            identity,
            link,
            session_events,
            wait_timeout: config.wait_timeout,
        })
    }

    /// Join the game and run the main event loop until the player quits.
    ///
    /// The session is shut down on every exit path, including a failed join.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let result = self.play().await;
        self.link.shutdown(SHUTDOWN_GRACE).await;
        result
    }

    async fn play(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(&self.app)?;

        tracing::info!(player = %self.identity.player_id(), "joining game");
        self.link.session().join(self.identity.player_id())?;
        let actions = self.app.handle(AppEvent::Joined);
        self.process_actions(actions)?;

        self.event_loop().await
    }

    async fn event_loop(&mut self) -> Result<(), RuntimeError> {
        let mut event_stream = EventStream::new();
        let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

        let wait = self.wait_timeout;
        let wait_timer = async move {
            match wait {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(wait_timer);
        let mut wait_elapsed = false;

        loop {
            let actions = tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.terminal_event(event),
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => vec![AppAction::Quit],
                    }
                }

                Some(event) = self.session_events.recv() => {
                    tracing::debug!(?event, "session event");
                    self.app.handle(event.into())
                }

                _ = tick_interval.tick() => self.app.handle(AppEvent::Tick),

                () = &mut wait_timer, if !wait_elapsed => {
                    wait_elapsed = true;
                    self.app.handle(AppEvent::WaitTimedOut)
                }
            };

            if self.process_actions(actions)? {
                return Ok(());
            }
        }
    }

    fn terminal_event(&mut self, event: Event) -> Vec<AppAction> {
        let app_event = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key.code),
            Event::Resize(cols, rows) => AppEvent::Resize(cols, rows),
            _ => return vec![],
        };
        self.app.handle(app_event)
    }

    /// Process actions returned by the app. Returns true if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, RuntimeError> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.terminal.draw(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Press(color) => {
                        if let Err(e) = self.link.session().send_color(color) {
                            tracing::warn!(error = %e, %color, "press rejected");
                            let event = AppEvent::PressFailed { reason: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }
}
