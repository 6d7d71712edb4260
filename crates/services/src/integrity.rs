use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::IntegrityError;

/// Default sampling cadence of the background integrity monitor.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Reference flag probability per sample.
pub const DEFAULT_FLAG_PROBABILITY: f64 = 0.1;

/// One discrete integrity flag raised by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityEvent;

/// Triggering policy evaluated once per sample.
///
/// Injectable so deterministic sequences can replace the reference
/// probability draw in tests. The trigger sees only the sample instant,
/// never session content.
pub trait IntegrityTrigger: Send {
    fn should_flag(&mut self, now: DateTime<Utc>) -> bool;
}

/// Reference behavior: a fixed-probability draw per sample.
#[derive(Debug, Clone)]
pub struct RandomTrigger {
    probability: f64,
}

impl RandomTrigger {
    /// # Errors
    ///
    /// Returns `IntegrityError::InvalidProbability` outside `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self, IntegrityError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(IntegrityError::InvalidProbability(probability));
        }
        Ok(Self { probability })
    }

    /// The reference 10% draw.
    #[must_use]
    pub fn default_rate() -> Self {
        Self {
            probability: DEFAULT_FLAG_PROBABILITY,
        }
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl IntegrityTrigger for RandomTrigger {
    fn should_flag(&mut self, _now: DateTime<Utc>) -> bool {
        rand::rng().random_bool(self.probability)
    }
}

/// Deterministic trigger for tests: replays a fixed script, then stays quiet.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrigger {
    script: VecDeque<bool>,
}

impl ScriptedTrigger {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl IntegrityTrigger for ScriptedTrigger {
    fn should_flag(&mut self, _now: DateTime<Utc>) -> bool {
        self.script.pop_front().unwrap_or(false)
    }
}

/// Background sampler that forwards integrity flags into the session loop.
///
/// Owns its timer task; `shutdown` (or drop) cancels it so no flag can be
/// delivered after the owning session tears down.
#[derive(Debug)]
pub struct IntegrityMonitor {
    handle: JoinHandle<()>,
}

impl IntegrityMonitor {
    /// Start sampling on the given cadence.
    ///
    /// The first sample happens one full interval after spawn. Sampling ends
    /// when the receiving side closes or the monitor is shut down.
    #[must_use]
    pub fn spawn(
        mut trigger: Box<dyn IntegrityTrigger>,
        sample_interval: Duration,
        base: DateTime<Utc>,
        events: mpsc::Sender<IntegrityEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let origin = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval(sample_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // interval fires immediately once; the sample cadence starts
            // one period later.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = base
                    + chrono::Duration::from_std(origin.elapsed())
                        .unwrap_or_else(|_| chrono::Duration::zero());
                if trigger.should_flag(now) && events.send(IntegrityEvent).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop sampling. Idempotent.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for IntegrityMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
