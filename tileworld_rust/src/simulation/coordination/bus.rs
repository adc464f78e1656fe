//! In-process message bus with a per-tick lifecycle.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::simulation::coordination::message::{AgentId, Message};

#[derive(Debug, Default)]
struct Backlog {
    messages: Vec<Message>,
    /// Index of the next unread message, per reader
    cursors: HashMap<AgentId, usize>,
}

/// The shared bus agents publish to and drain from.
///
/// Appends are serialised behind a mutex so agents may publish from
/// different threads. The environment calls [`MessageBus::advance_tick`]
/// once per tick, which discards the previous tick's backlog.
#[derive(Debug, Default)]
pub struct MessageBus {
    inner: Mutex<Backlog>,
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Backlog> {
        // A panicking publisher cannot leave the backlog half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn publish(&self, message: Message) {
        self.lock().messages.push(message);
    }

    /// Messages published this tick that `reader` has not drained yet and
    /// that are addressed to it or broadcast, in publish order.
    pub fn drain(&self, reader: AgentId) -> Vec<Message> {
        let mut backlog = self.lock();
        let start = backlog.cursors.get(&reader).copied().unwrap_or(0);
        let end = backlog.messages.len();
        let unread = backlog.messages[start.min(end)..]
            .iter()
            .filter(|m| m.to.includes(reader))
            .copied()
            .collect();
        backlog.cursors.insert(reader, end);
        unread
    }

    /// Starts a new tick: every message and read cursor is discarded.
    pub fn advance_tick(&self) {
        let mut backlog = self.lock();
        backlog.messages.clear();
        backlog.cursors.clear();
    }

    /// Number of messages published this tick.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
