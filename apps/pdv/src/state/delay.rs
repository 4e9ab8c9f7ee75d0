//! # Cancellable Delay
//!
//! The short pause the till shows before completing a login or a sale.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let handle = CancelHandle::new();          (one per session)          │
//! │  let outcome = handle.delay(500ms).wait().await;                        │
//! │                                                                         │
//! │      sleep(500ms) ─────────────┐                                        │
//! │                                ├──► select! ──► Elapsed | Cancelled    │
//! │      handle.cancel() ──────────┘                                        │
//! │                                                                         │
//! │  Cancelled: the caller drops the pending completion, nothing changes.  │
//! │  After cancel() every new delay resolves Cancelled immediately.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How a delay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Elapsed,
    Cancelled,
}

/// Cancels every delay created from it (and its clones).
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        CancelHandle { tx: Arc::new(tx) }
    }

    /// Resolves all pending and future delays as `Cancelled`.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Creates a delay tied to this handle.
    pub fn delay(&self, duration: Duration) -> CancellableDelay {
        CancellableDelay {
            duration,
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A sleep that a [`CancelHandle`] can cut short.
#[derive(Debug)]
pub struct CancellableDelay {
    duration: Duration,
    rx: watch::Receiver<bool>,
}

impl CancellableDelay {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn wait(mut self) -> DelayOutcome {
        if *self.rx.borrow_and_update() {
            return DelayOutcome::Cancelled;
        }

        let sleep = tokio::time::sleep(self.duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return DelayOutcome::Elapsed,
                changed = self.rx.changed() => match changed {
                    Ok(()) if *self.rx.borrow_and_update() => return DelayOutcome::Cancelled,
                    Ok(()) => continue,
                    // Every handle is gone, nobody can cancel any more
                    Err(_) => {
                        (&mut sleep).await;
                        return DelayOutcome::Elapsed;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delay_elapses() {
        let handle = CancelHandle::new();
        let started = tokio::time::Instant::now();

        let outcome = handle.delay(Duration::from_millis(500)).wait().await;

        assert_eq!(outcome, DelayOutcome::Elapsed);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_pending_delay() {
        let handle = CancelHandle::new();
        let delay = handle.delay(Duration::from_secs(60));
        let waiter = tokio::spawn(delay.wait());

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        assert_eq!(waiter.await.unwrap(), DelayOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_delay_after_cancel_is_immediate() {
        let handle = CancelHandle::new();
        handle.cancel();
        assert!(handle.is_cancelled());

        let outcome = handle.delay(Duration::from_secs(3600)).wait().await;
        assert_eq!(outcome, DelayOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_still_elapses() {
        let handle = CancelHandle::new();
        let delay = handle.delay(Duration::from_millis(100));
        drop(handle);

        assert_eq!(delay.wait().await, DelayOutcome::Elapsed);
    }

    #[tokio::test]
    async fn test_zero_delay() {
        let handle = CancelHandle::new();
        assert_eq!(handle.delay(Duration::ZERO).wait().await, DelayOutcome::Elapsed);
    }
}
