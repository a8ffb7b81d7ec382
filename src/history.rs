//! Bounded history of decoded push messages for dashboard display.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::framing::PushMessage;

/// Retention policy for a [`DisplayLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RetentionPolicy {
    /// Maximum number of messages kept; the oldest are evicted first
    pub capacity: usize,
}

impl RetentionPolicy {
    pub const DEFAULT_CAPACITY: usize = 512;

    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1) }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Wraparound-aware timestamp comparison: returns true if `a` is after `b`.
///
/// Device timestamps are 32-bit millisecond counters, so ordering holds as
/// long as the two values are less than half the counter range apart.
pub fn timestamp_after(a: u32, b: u32) -> bool {
    if a == b {
        return false;
    }
    a.wrapping_sub(b) < 0x8000_0000
}

/// Ring buffer of push messages in arrival order.
#[derive(Debug, Clone)]
pub struct DisplayLog {
    entries: VecDeque<Arc<PushMessage>>,
    policy: RetentionPolicy,
}

impl Default for DisplayLog {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

impl DisplayLog {
    pub fn new(policy: RetentionPolicy) -> Self {
        let policy = RetentionPolicy::new(policy.capacity);
        let initial = policy.capacity.min(RetentionPolicy::DEFAULT_CAPACITY);
        Self { entries: VecDeque::with_capacity(initial), policy }
    }

    /// Append a message, returning the evicted one when the log is full.
    pub fn push(&mut self, message: Arc<PushMessage>) -> Option<Arc<PushMessage>> {
        let evicted =
            if self.entries.len() >= self.policy.capacity { self.entries.pop_front() } else { None };
        self.entries.push_back(message);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.policy.capacity
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Most recently received message.
    pub fn latest(&self) -> Option<&Arc<PushMessage>> {
        self.entries.back()
    }

    /// Messages from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PushMessage>> {
        self.entries.iter()
    }

    /// Messages whose timestamp is after `timestamp`, in arrival order.
    pub fn since(&self, timestamp: u32) -> Vec<Arc<PushMessage>> {
        self.entries
            .iter()
            .filter(|message| timestamp_after(message.timestamp, timestamp))
            .cloned()
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Arc<PushMessage>> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
