//! Supersession primitives: only the latest scheduled action proceeds

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic ticket counter
///
/// Work that may be overtaken takes a ticket before it suspends and
/// commits only if its ticket is still current afterwards.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating all earlier ones
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current() == ticket
    }
}

/// Coalesces bursts of calls into the last one
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    latest: Generation,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            latest: Generation::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait out the quiescence window.
    ///
    /// Returns `true` only if no other `settle` or `cancel` happened in the
    /// meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.advance();
        tokio::time::sleep(self.window).await;
        self.latest.is_current(ticket)
    }

    /// Drop whatever is currently waiting
    pub fn cancel(&self) {
        self.latest.advance();
    }
}
