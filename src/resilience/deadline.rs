//! Absolute deadlines for cancellable operations.

use std::time::Duration;
use tokio::time::Instant;

/// A point in time after which an operation must stop waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Time left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Clamp a wait so it never runs past the deadline.
    pub fn clamp(&self, wait: Duration) -> Duration {
        wait.min(self.remaining())
    }
}
