//! Cancellable scheduled-task handle for the periodic tick.
//!
//! The schedule is re-armed after every firing (sleep, fire, sleep) rather
//! than free-running, so firings for one ticker are strictly sequential
//! and never overlap. Cancellation takes effect between firings.

use std::time::Duration;

use tokio::task::JoinHandle;

/// One second, the fixed cadence of the timer runtime.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a repeating scheduled callback.
///
/// Arming returns the handle; dropping it or calling [`cancel`](Self::cancel)
/// stops the schedule. The callback returns whether to keep firing, which
/// lets a tick that observes a stopped or deleted timer end the schedule
/// itself.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Arm a repeating callback with the given period. Requires a running
    /// tokio runtime.
    pub fn arm<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if !callback() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop the schedule. A firing in progress finishes; no further firings
    /// happen.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the schedule can still fire.
    pub fn is_armed(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period_until_callback_declines() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let ticker = Ticker::arm(TICK_PERIOD, move || {
            counter.fetch_add(1, Ordering::SeqCst) + 1 < 3
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_future_firings() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let ticker = Ticker::arm(TICK_PERIOD, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        ticker.cancel();
        let fired = count.load(Ordering::SeqCst);
        assert_eq!(fired, 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        {
            let _ticker = Ticker::arm(TICK_PERIOD, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });
            tokio::time::sleep(Duration::from_millis(1500)).await;
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
