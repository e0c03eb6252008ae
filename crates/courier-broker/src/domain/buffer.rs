//! FIFO buffer of messages awaiting relay.

use courier_types::mark_relayed;
use std::collections::VecDeque;

/// Ordered, unbounded in-memory buffer; insertion order is arrival order.
#[derive(Debug, Clone, Default)]
pub struct RelayBuffer {
    messages: VecDeque<String>,
}

impl RelayBuffer {
    /// Empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one received message.
    pub fn push(&mut self, message: String) {
        self.messages.push_back(message);
    }

    /// Oldest message with the provenance marker appended.
    pub fn pop_relayed(&mut self) -> Option<String> {
        self.messages.pop_front().map(|m| mark_relayed(&m))
    }

    /// Messages still buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
