use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Remaining time at or below which the one-shot warning edge fires.
pub const NEAR_EXPIRY_THRESHOLD_SECS: i64 = 120;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClockError {
    #[error("exam duration must be at least one minute")]
    ZeroDuration,
}

/// One-shot edges of the exam countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEdge {
    NearExpiry,
    Expired,
}

/// A single countdown observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTick {
    pub remaining_secs: i64,
    /// Zero-padded `MM:SS` countdown text.
    pub display: String,
    pub edge: Option<ClockEdge>,
}

/// Countdown state for one exam attempt.
///
/// The clock is idle until [`SessionClock::start`] supplies a start instant;
/// an idle clock produces no ticks and cannot expire. Edge latches are plain
/// booleans inspected on every observation, so each edge fires exactly once
/// per started clock regardless of tick delivery jitter. After the expiry
/// edge the clock stops producing ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    started_at: Option<DateTime<Utc>>,
    duration_minutes: u32,
    near_expiry_fired: bool,
    expired_fired: bool,
}

impl SessionClock {
    /// Create an idle clock with a fixed duration in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `ClockError::ZeroDuration` for a zero-minute duration.
    pub fn new(duration_minutes: u32) -> Result<Self, ClockError> {
        if duration_minutes == 0 {
            return Err(ClockError::ZeroDuration);
        }

        Ok(Self {
            started_at: None,
            duration_minutes,
            near_expiry_fired: false,
            expired_fired: false,
        })
    }

    /// Begin (or re-begin) the countdown at the given instant.
    ///
    /// Restarting resets both one-shot edge latches.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.near_expiry_fired = false;
        self.expired_fired = false;
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.started_at.is_none()
    }

    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.expired_fired
    }

    /// True once the warning edge has been reported for this run.
    #[must_use]
    pub fn is_near_expiry(&self) -> bool {
        self.near_expiry_fired
    }

    /// The instant the countdown reaches zero, if started.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .map(|start| start + Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Whole seconds elapsed since start, clamped to the exam duration.
    ///
    /// Returns 0 for an idle clock.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let total = i64::from(self.duration_minutes) * 60;
        (now - start).num_seconds().clamp(0, total)
    }

    /// Observe the countdown at `now`.
    ///
    /// Returns `None` while idle and after the expiry edge has fired. At most
    /// one edge is reported per tick; expiry dominates the warning when both
    /// become due on the same observation.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Option<ClockTick> {
        let deadline = self.deadline()?;
        if self.expired_fired {
            return None;
        }

        let remaining_secs = (deadline - now).num_seconds().max(0);
        let display = format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60);

        let edge = if remaining_secs == 0 {
            self.expired_fired = true;
            self.near_expiry_fired = true;
            Some(ClockEdge::Expired)
        } else if remaining_secs <= NEAR_EXPIRY_THRESHOLD_SECS && !self.near_expiry_fired {
            self.near_expiry_fired = true;
            Some(ClockEdge::NearExpiry)
        } else {
            None
        };

        Some(ClockTick {
            remaining_secs,
            display,
            edge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rejects_zero_duration() {
        assert_eq!(SessionClock::new(0).unwrap_err(), ClockError::ZeroDuration);
    }

    #[test]
    fn idle_clock_produces_no_ticks() {
        let mut clock = SessionClock::new(60).unwrap();
        assert!(clock.is_idle());
        assert!(clock.observe(fixed_now()).is_none());
        assert_eq!(clock.elapsed_secs(fixed_now()), 0);
    }

    #[test]
    fn countdown_display_is_zero_padded() {
        let start = fixed_now();
        let mut clock = SessionClock::new(90).unwrap();
        clock.start(start);

        let tick = clock.observe(start + Duration::seconds(5)).unwrap();
        assert_eq!(tick.display, "89:55");
        assert_eq!(tick.edge, None);
    }

    #[test]
    fn near_expiry_fires_once_at_first_tick_within_threshold() {
        let start = fixed_now();
        let mut clock = SessionClock::new(1).unwrap();
        clock.start(start);

        // 59s remaining at t+1s: already within the 120s threshold.
        let before = clock.observe(start + Duration::seconds(1)).unwrap();
        assert_eq!(before.edge, Some(ClockEdge::NearExpiry));

        let again = clock.observe(start + Duration::seconds(2)).unwrap();
        assert_eq!(again.edge, None);
    }

    #[test]
    fn near_expiry_not_before_threshold() {
        let start = fixed_now();
        let mut clock = SessionClock::new(3).unwrap();
        clock.start(start);

        let early = clock.observe(start + Duration::seconds(59)).unwrap();
        assert_eq!(early.remaining_secs, 121);
        assert_eq!(early.edge, None);

        let at_threshold = clock.observe(start + Duration::seconds(60)).unwrap();
        assert_eq!(at_threshold.remaining_secs, 120);
        assert_eq!(at_threshold.edge, Some(ClockEdge::NearExpiry));
    }

    #[test]
    fn expiry_fires_once_then_ticking_stops() {
        let start = fixed_now();
        let mut clock = SessionClock::new(1).unwrap();
        clock.start(start);
        clock.observe(start + Duration::seconds(58));

        let expired = clock.observe(start + Duration::seconds(60)).unwrap();
        assert_eq!(expired.remaining_secs, 0);
        assert_eq!(expired.display, "00:00");
        assert_eq!(expired.edge, Some(ClockEdge::Expired));
        assert!(clock.has_expired());

        assert!(clock.observe(start + Duration::seconds(61)).is_none());
    }

    #[test]
    fn expiry_dominates_warning_on_the_same_tick() {
        let start = fixed_now();
        let mut clock = SessionClock::new(1).unwrap();
        clock.start(start);

        // First observation arrives after the deadline: only Expired fires.
        let tick = clock.observe(start + Duration::seconds(120)).unwrap();
        assert_eq!(tick.edge, Some(ClockEdge::Expired));
        assert!(clock.observe(start + Duration::seconds(121)).is_none());
    }

    #[test]
    fn restart_resets_both_latches() {
        let start = fixed_now();
        let mut clock = SessionClock::new(1).unwrap();
        clock.start(start);
        clock.observe(start + Duration::seconds(60));
        assert!(clock.has_expired());

        let restarted = start + Duration::seconds(300);
        clock.start(restarted);
        assert!(!clock.has_expired());
        let tick = clock.observe(restarted + Duration::seconds(1)).unwrap();
        assert_eq!(tick.edge, Some(ClockEdge::NearExpiry));
    }

    #[test]
    fn elapsed_is_clamped_to_duration() {
        let start = fixed_now();
        let mut clock = SessionClock::new(1).unwrap();
        clock.start(start);

        assert_eq!(clock.elapsed_secs(start + Duration::seconds(10)), 10);
        assert_eq!(clock.elapsed_secs(start + Duration::seconds(600)), 60);
        assert_eq!(clock.elapsed_secs(start - Duration::seconds(5)), 0);
    }
}
