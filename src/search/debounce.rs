//! Input debouncing
//!
//! Each push restarts the quiet interval; a value is only delivered once no
//! newer value arrived for the whole interval. At most one delivery is ever
//! pending.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Restartable quiet-interval timer delivering the last pushed value
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver settled values arrive on
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    /// Replace any pending value and restart the timer
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is still waiting for its quiet interval
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Interval a value must go unreplaced before it is delivered
    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Instant};

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_only_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        for text in ["P", "Pa", "Par", "Pari", "Paris"] {
            debouncer.push(text.to_string());
            advance(Duration::from_millis(100)).await;
        }

        let settled_from = Instant::now();
        assert_eq!(rx.recv().await.as_deref(), Some("Paris"));
        assert!(settled_from.elapsed() >= Duration::from_millis(200));

        tokio::time::sleep(QUIET * 2).await;
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_quiet_interval() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);
        let start = Instant::now();

        debouncer.push(1u32);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.quiet(), QUIET);
        assert_eq!(rx.recv().await, Some(1));
        assert!(start.elapsed() >= debouncer.quiet());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_deliver_separately() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("Lon");
        assert_eq!(rx.recv().await, Some("Lon"));

        debouncer.push("London");
        assert_eq!(rx.recv().await, Some("London"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("stale");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(QUIET * 2).await;
        assert!(rx.try_recv().is_err());
    }
}
