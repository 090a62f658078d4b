//! Store: bounded ring buffer of forwarded messages.
//!
//! Every message the pipeline forwards (exit notices, sync receipts,
//! rewritten annotated text, passthrough payloads) lands here with a
//! monotonically increasing sequence number. When full, the oldest message
//! is evicted.

use std::collections::VecDeque;

/// Where a logged message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageSource {
    /// An exit notice shown on the display.
    ExitNotice,
    /// A sync snapshot was received and applied.
    Sync,
    /// Annotated text with `@(word:X)` tokens rewritten.
    Annotated,
    /// Any other payload, forwarded unchanged.
    Passthrough,
    /// Pipeline-internal notes (selection changes, filter changes).
    System,
}

impl std::fmt::Display for MessageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSource::ExitNotice => write!(f, "exit"),
            MessageSource::Sync => write!(f, "sync"),
            MessageSource::Annotated => write!(f, "annotated"),
            MessageSource::Passthrough => write!(f, "passthrough"),
            MessageSource::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedMessage {
    pub seq: u64,
    pub source: MessageSource,
    pub text: String,
}

#[derive(Debug)]
pub struct MessageLog {
    entries: VecDeque<LoggedMessage>,
    capacity: usize,
    next_seq: u64,
}

impl MessageLog {
    /// A log holding at most `capacity` messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 1,
        }
    }

    /// Append a message, evicting the oldest if full. Returns its sequence
    /// number.
    pub fn push(&mut self, source: MessageSource, text: impl Into<String>) -> u64 {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(LoggedMessage { seq, source, text: text.into() });
        seq
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Messages oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LoggedMessage> {
        self.entries.iter()
    }

    /// Messages from one source, oldest first.
    pub fn by_source(&self, source: MessageSource) -> impl Iterator<Item = &LoggedMessage> {
        self.entries.iter().filter(move |m| m.source == source)
    }
}
