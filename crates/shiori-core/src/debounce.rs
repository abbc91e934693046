//! Timer-based input coalescing.
//!
//! A [`Debouncer`] delays delivery of a value until the input has been
//! quiet for one window; each new [`push`] cancels the previous timer.
//! Used for search-as-you-type so only the settled query reaches the
//! network.
//!
//! [`push`]: Debouncer::push

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

/// Coalesces a burst of values into the last one, delivered after the
/// window elapses without further input.
pub struct Debouncer<T> {
    window: Duration,
    seq: Arc<AtomicU64>,
    out: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer delivering settled values on the returned
    /// receiver.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (out, rx) = mpsc::unbounded_channel();
        (
            Self {
                window,
                seq: Arc::new(AtomicU64::new(0)),
                out,
            },
            rx,
        )
    }

    /// Schedule `value` for delivery after the window, cancelling any
    /// value still waiting.
    pub fn push(&self, value: T) {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let seq = Arc::clone(&self.seq);
        let out = self.out.clone();
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Deliver only if no newer push superseded this one.
            if seq.load(Ordering::SeqCst) == ticket {
                let _ = out.send(value);
            }
        });
    }

    /// Drop whatever is still waiting without delivering it.
    pub fn cancel(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_in_burst_is_delivered() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(400));

        debouncer.push("f");
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.push("fr");
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.push("frieren");

        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await, Some("frieren"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_in_separate_windows_both_arrive() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(400));

        debouncer.push(1);
        tokio::time::advance(Duration::from_millis(450)).await;
        debouncer.push(2);
        tokio::time::advance(Duration::from_millis(450)).await;

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(400));

        debouncer.push("stale");
        debouncer.cancel();

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
