//! Simulated-typing reply timer
//!
//! Delivers a callback after a delay on a spawned task. Cancelling (or
//! dropping the guard at chat close) aborts the task, so no reply is
//! delivered after the chat is gone.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Guard for a pending delayed reply
pub struct ReplyTimer {
    handle: JoinHandle<()>,
}

impl ReplyTimer {
    /// Schedule `deliver` to run after `delay`
    pub fn schedule<F>(delay: Duration, deliver: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            deliver();
        });
        Self { handle }
    }

    /// Discard the pending reply
    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Whether the reply already fired (or was cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ReplyTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_timer_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let timer = ReplyTimer::schedule(Duration::from_millis(10), move || {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(timer.is_finished());
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_reply() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let timer = ReplyTimer::schedule(Duration::from_millis(50), move || {
            flag.store(true, Ordering::SeqCst);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_drop_discards_pending_reply() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        {
            let _timer = ReplyTimer::schedule(Duration::from_millis(50), move || {
                flag.store(true, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
