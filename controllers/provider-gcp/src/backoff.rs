//! # Fibonacci Backoff
//!
//! Progressive retry delays for failed reconciles. The sequence grows more
//! slowly than exponential backoff: with a 5s minimum it runs
//! 5s, 5s, 10s, 15s, 25s, 40s, ... up to the configured maximum.
//!
//! `BackoffTable` keeps one sequence per managed resource so that a failing
//! object backs off without slowing down its healthy neighbours.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at `max`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_secs: u64,
    prev_secs: u64,
    current_secs: u64,
    max_secs: u64,
}

impl FibonacciBackoff {
    /// Create a backoff starting at `min` and capped at `max`
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_secs = min.as_secs().max(1);
        Self {
            min_secs,
            prev_secs: 0,
            current_secs: min_secs,
            max_secs: max.as_secs().max(min_secs),
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result = self.current_secs;
        let next = self.prev_secs.saturating_add(self.current_secs);
        self.prev_secs = self.current_secs;
        self.current_secs = next.min(self.max_secs);
        result
    }

    /// Get the next backoff duration and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    /// Reset the backoff to the initial state
    pub fn reset(&mut self) {
        self.prev_secs = 0;
        self.current_secs = self.min_secs;
    }
}

/// Per-object backoff sequences keyed by `Kind/name`
#[derive(Debug)]
pub struct BackoffTable {
    min: Duration,
    max: Duration,
    entries: Mutex<HashMap<String, FibonacciBackoff>>,
}

impl BackoffTable {
    /// Create an empty table whose sequences share `min` and `max`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Next delay for `key`, starting a sequence on first failure
    pub fn next(&self, key: &str) -> Duration {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key.to_string())
            .or_insert_with(|| FibonacciBackoff::new(self.min, self.max))
            .next_backoff()
    }

    /// Forget the sequence of `key` after a successful reconcile
    pub fn reset(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
