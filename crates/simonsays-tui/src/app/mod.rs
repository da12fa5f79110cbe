//! UI state machine
//!
//! Pure state machine that processes terminal and session events, producing
//! actions for the runtime to execute. Completely decoupled from I/O.
//!
//! # Architecture
//!
//! The App never talks to the session directly. It tracks what the player
//! should see (whose turn it is, which color is lit, how the game ended) and
//! emits [`AppAction::Press`] only during the local player's turn. The
//! session still enforces the protocol rules on its side.

mod action;
mod event;
mod state;

pub use action::AppAction;
pub use event::AppEvent;
use simonsays_client::{Color, EndReason, SessionEvent, TurnState};
pub use state::{LogEntry, LogKind, MessageLog, Outcome, Phase};

use crate::input::{KeyCommand, UNRECOGNIZED_KEY_NOTICE};

/// Ticks a lit color stays highlighted.
pub const LIGHT_TICKS: u8 = 3;

/// Ticks after a press during which further presses are dropped.
pub const PRESS_COOLDOWN_TICKS: u8 = 2;

/// Lines kept in the message log.
pub const LOG_CAPACITY: usize = 100;

/// UI state machine.
#[derive(Debug, Clone)]
pub struct App {
    player_id: String,
    server_addr: String,
    phase: Phase,
    outcome: Option<Outcome>,
    end_reason: Option<EndReason>,
    /// Server granted the local player the current turn.
    my_turn: bool,
    /// Local player has had at least one turn this game.
    had_turn: bool,
    /// Lit color and remaining ticks.
    lit: Option<(Color, u8)>,
    cooldown: u8,
    log: MessageLog,
    terminal_size: (u16, u16),
}

impl App {
    /// Create a new App for `player_id` playing on `server_addr`.
    pub fn new(player_id: impl Into<String>, server_addr: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            server_addr: server_addr.into(),
            phase: Phase::Waiting,
            outcome: None,
            end_reason: None,
            my_turn: false,
            had_turn: false,
            lit: None,
            cooldown: 0,
            log: MessageLog::new(LOG_CAPACITY),
            terminal_size: (80, 24),
        }
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(code) => self.handle_key(KeyCommand::from_key(code)),
            AppEvent::Tick => self.handle_tick(),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Joined => {
                self.log.push(LogKind::Info, "Waiting for another player...");
                vec![AppAction::Render]
            },
            AppEvent::Session(event) => self.handle_session(event),
            AppEvent::PressFailed { reason } => {
                self.log.push(LogKind::Notice, format!("Press not sent: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::WaitTimedOut => {
                if self.phase != Phase::Waiting {
                    return vec![];
                }
                self.log.push(LogKind::Notice, "No game started in time, giving up");
                vec![AppAction::Render, AppAction::Quit]
            },
        }
    }

    fn handle_key(&mut self, command: KeyCommand) -> Vec<AppAction> {
        match command {
            KeyCommand::Quit => vec![AppAction::Quit],
            KeyCommand::Ignore => vec![],
            KeyCommand::Press(Color::Unrecognized) => {
                self.log.push(LogKind::Notice, UNRECOGNIZED_KEY_NOTICE);
                vec![AppAction::Render]
            },
            KeyCommand::Press(color) => self.press(color),
        }
    }

    fn press(&mut self, color: Color) -> Vec<AppAction> {
        match self.phase {
            Phase::Waiting => {
                self.log.push(LogKind::Notice, "The game has not started yet");
                return vec![AppAction::Render];
            },
            Phase::Finished => {
                self.log.push(LogKind::Notice, "The game is over, press q to quit");
                return vec![AppAction::Render];
            },
            Phase::Playing => {},
        }

        if !self.my_turn {
            self.log.push(LogKind::Notice, "Wait for your turn");
            return vec![AppAction::Render];
        }
        if self.cooldown > 0 {
            return vec![];
        }

        self.cooldown = PRESS_COOLDOWN_TICKS;
        self.lit = Some((color, LIGHT_TICKS));
        vec![AppAction::Press(color), AppAction::Render]
    }

    fn handle_tick(&mut self) -> Vec<AppAction> {
        self.cooldown = self.cooldown.saturating_sub(1);

        match self.lit {
            Some((_, ticks)) if ticks <= 1 => {
                self.lit = None;
                vec![AppAction::Render]
            },
            Some((color, ticks)) => {
                self.lit = Some((color, ticks - 1));
                vec![]
            },
            None => vec![],
        }
    }

    fn handle_session(&mut self, event: SessionEvent) -> Vec<AppAction> {
        match event {
            SessionEvent::TurnChanged(turn) => self.handle_turn(turn),
            SessionEvent::Lightup(color) => {
                self.lit = Some((color, LIGHT_TICKS));
            },
            SessionEvent::ProtocolWarning(message) => {
                self.log.push(LogKind::Warning, message);
            },
            SessionEvent::SessionEnded(reason) => {
                self.phase = Phase::Finished;
                self.my_turn = false;
                self.end_reason = Some(reason);
                let text = match reason {
                    EndReason::Normal => "Thanks for Playing".to_owned(),
                    other => format!("Thanks for Playing ({other})"),
                };
                self.log.push(LogKind::Info, text);
            },
        }
        vec![AppAction::Render]
    }

    fn handle_turn(&mut self, turn: TurnState) {
        if self.phase == Phase::Finished {
            return;
        }

        match turn {
            TurnState::Begin => {
                self.phase = Phase::Playing;
                self.log.push(LogKind::Info, "The game has started");
            },
            TurnState::StartTurn => {
                self.my_turn = true;
                self.had_turn = true;
                self.cooldown = 0;
                self.log.push(LogKind::Info, "Your Turn!");
            },
            TurnState::StopTurn => {
                self.my_turn = false;
                let text = if self.had_turn {
                    "Nice Job! Now it's the other player's turn"
                } else {
                    "It's the other player's turn first"
                };
                self.log.push(LogKind::Info, text);
            },
            TurnState::Win | TurnState::Lose => {
                let (outcome, text) = if turn == TurnState::Win {
                    (Outcome::Won, "You Win!")
                } else {
                    (Outcome::Lost, "You Lost!")
                };
                self.phase = Phase::Finished;
                self.my_turn = false;
                self.outcome = Some(outcome);
                self.log.push(LogKind::Info, text);
            },
            TurnState::Unrecognized(_) => {},
        }
    }

    /// Local player identifier.
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Server address.
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    /// Game phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How the game ended. `None` until a win or loss.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Why the session ended. `None` while it is running.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Whether the local player may press now.
    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    /// Currently lit color.
    pub fn lit_color(&self) -> Option<Color> {
        self.lit.map(|(color, _)| color)
    }

    /// Message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}
