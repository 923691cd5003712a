//! Cancellable debounce timer for search-as-you-type

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Runs only the most recent of a burst of calls.
///
/// Every `run` re-arms the timer and supersedes the calls before it. A call
/// superseded while waiting never starts its work; one superseded while its
/// work is running has the result dropped. Either way it returns `None`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay, then run `work` unless a later call arrived
    pub async fn run<F, Fut, T>(&self, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            tracing::trace!(ticket, "debounced call superseded before start");
            return None;
        }

        let output = work().await;
        if !self.is_current(ticket) {
            tracing::trace!(ticket, "debounced call superseded while running");
            return None;
        }
        Some(output)
    }

    /// Supersede every pending call
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}
