//! UI state types
//!
//! State structures used by the App state machine.

use std::collections::VecDeque;

/// Game phase as seen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Join sent, waiting for an opponent.
    Waiting,
    /// Game in progress.
    Playing,
    /// Game over or session ended.
    Finished,
}

/// How the game ended for the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Local player won.
    Won,
    /// Local player lost.
    Lost,
}

/// Kind of a log line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Game progress.
    Info,
    /// Local player's input was refused.
    Notice,
    /// Server sent something unexpected.
    Warning,
}

/// One line in the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Line kind.
    pub kind: LogKind,
    /// Line text.
    pub text: String,
}

/// Bounded message log. Oldest lines are dropped first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    /// Create an empty log holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity: capacity.max(1) }
    }

    /// Append a line.
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { kind, text: text.into() });
    }

    /// Lines, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
