//! Pending-command queue with drain scheduling.
//!
//! Commands are executed in arrival order by a drain activation that the
//! bridge loop runs after the receive path has returned. Enqueuing into an
//! empty queue schedules one activation; enqueuing into a non-empty queue
//! relies on the activation already scheduled.

use std::collections::VecDeque;

/// Counters kept by the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Commands ever enqueued
    pub enqueued: u64,
    /// Drain activations scheduled
    pub drains_scheduled: u64,
}

/// Ordered single-consumer FIFO of command strings
#[derive(Debug, Default)]
pub struct CommandQueue {
    entries: VecDeque<String>,
    drain_scheduled: bool,
    stats: QueueStats,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command; returns true if this call scheduled a drain
    pub fn enqueue(&mut self, command: impl Into<String>) -> bool {
        let scheduled = self.entries.is_empty() && !self.drain_scheduled;
        if scheduled {
            self.drain_scheduled = true;
            self.stats.drains_scheduled += 1;
        }

        let command = command.into();
        tracing::debug!("Queued '{}' ({} pending)", command, self.entries.len() + 1);
        self.entries.push_back(command);
        self.stats.enqueued += 1;
        scheduled
    }

    /// Whether a drain activation is waiting to run
    pub fn has_pending_drain(&self) -> bool {
        self.drain_scheduled
    }

    /// Consume the scheduled activation; returns false if none was pending
    pub fn take_drain(&mut self) -> bool {
        std::mem::take(&mut self.drain_scheduled)
    }

    /// Remove the oldest command
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop_front()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Queue counters
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}
