//! Deadline queue for fixed-delay callbacks
//!
//! Nothing here sleeps. The owner asks for the next deadline, waits however
//! it likes, then hands the current [`Instant`] to [`Timers::take_due`].

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Timers<K> {
    pending: Vec<(K, Instant)>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: PartialEq + Copy> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `key` to fire `delay` after `now`, replacing any earlier schedule for it
    pub fn schedule(&mut self, key: K, now: Instant, delay: Duration) {
        self.cancel(key);
        self.pending.push((key, now + delay));
    }

    /// Returns true if `key` was pending
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        self.pending.len() != before
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == key)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at)| *at).min()
    }

    /// Removes and returns every key whose deadline is at or before `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = Vec::new();
        self.pending.retain(|&(key, at)| {
            if at <= now {
                due.push((key, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, at)| at);
        due.into_iter().map(|(key, _)| key).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
