//! Deferred shell actions
//!
//! Deadlines are checked when the host ticks; nothing here sleeps. Entries
//! with the same deadline fire in the order they were scheduled.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Instant, u64), T>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert((deadline, id), payload);
        TimerId(id)
    }

    pub fn schedule_in(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        self.schedule(now + delay, payload)
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = *self.entries.keys().find(|(_, seq)| *seq == id.0)?;
        self.entries.remove(&key)
    }

    /// Remove and return every payload due at `now`, earliest first
    pub fn due(&mut self, now: Instant) -> Vec<T> {
        let later = self.entries.split_off(&(now, u64::MAX));
        std::mem::replace(&mut self.entries, later)
            .into_values()
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
