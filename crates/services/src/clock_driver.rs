use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cadence of the exam countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drives the exam clock on a fixed 1-second cadence.
///
/// Each pulse carries the observation instant, derived from the start
/// instant plus the timer's own elapsed time, so tests running under
/// virtual time see a consistent countdown. The driver owns its timer
/// task; `shutdown` (or drop) cancels it, guaranteeing no pulse reaches
/// the session after teardown.
#[derive(Debug)]
pub struct ClockDriver {
    handle: JoinHandle<()>,
}

impl ClockDriver {
    /// Start pulsing. Pulsing ends when the receiver closes or the driver
    /// is shut down.
    #[must_use]
    pub fn spawn(base: DateTime<Utc>, pulses: mpsc::Sender<DateTime<Utc>>) -> Self {
        let handle = tokio::spawn(async move {
            let origin = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // Skip the interval's immediate first fire; the countdown is
            // observed once per elapsed second.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = base
                    + chrono::Duration::from_std(origin.elapsed())
                        .unwrap_or_else(|_| chrono::Duration::zero());
                if pulses.send(now).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop pulsing. Idempotent.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::time::fixed_now;

    #[tokio::test(start_paused = true)]
    async fn pulses_advance_one_second_at_a_time() {
        let (tx, mut rx) = mpsc::channel(8);
        let driver = ClockDriver::spawn(fixed_now(), tx);

        tokio::time::sleep(Duration::from_secs(3)).await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first, fixed_now() + chrono::Duration::seconds(1));
        assert_eq!(second, fixed_now() + chrono::Duration::seconds(2));
        driver.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn no_pulse_after_shutdown() {
        let (tx, mut rx) = mpsc::channel(8);
        let driver = ClockDriver::spawn(fixed_now(), tx);

        driver.shutdown();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(rx.try_recv().is_err());
    }
}
