//! Bounded, insertion-ordered history buffers.
//!
//! Every panel of the dashboard keeps a short trail of what happened recently:
//! spoken commands, screen actions and HTTP probe calls. Each trail holds the
//! most recent `N` entries and silently drops the oldest one once full.

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Number of recognized voice commands kept for display.
pub const COMMAND_HISTORY_CAPACITY: usize = 5;
/// Number of screen-control actions kept in the action log.
pub const SCREEN_ACTION_CAPACITY: usize = 8;
/// Number of HTTP probe calls kept in the call history.
pub const API_CALL_CAPACITY: usize = 10;

/// A fixed-capacity FIFO buffer. Oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Creates an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest one when the buffer is full.
    pub fn push(&mut self, entry: T) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently pushed entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Copies the entries out, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T: Serialize> Serialize for BoundedHistory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
