use chrono::{DateTime, Utc};
use std::fmt;

use assess_core::model::{
    AnswerSheet, AttemptId, ClockTick, PermissionState, Question, SessionClock,
};

use crate::error::{SessionError, SubmissionError};
use crate::submission::{SubmissionPayload, SubmissionReceipt};

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Terminal result of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Lifecycle of one attempt. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingStart,
    InProgress,
    Submitting,
    Terminated(Outcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one candidate's timed attempt.
///
/// Owns the ordered question set, the current position, the answer sheet,
/// the exam countdown, and the integrity flag count. All mutation goes
/// through phase-guarded methods; once the single-use submission latch has
/// fired, every further trigger of any origin is rejected.
pub struct AssessmentSession {
    attempt_id: AttemptId,
    questions: Vec<Question>,
    current: usize,
    answers: AnswerSheet,
    clock: SessionClock,
    integrity_flags: u32,
    phase: SessionPhase,
    metadata: serde_json::Value,
    time_display: String,
    receipt: Option<SubmissionReceipt>,
    failure_message: Option<String>,
}

impl AssessmentSession {
    /// Create a session awaiting its pre-check.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for an empty question set and
    /// `SessionError::Clock` for a zero duration.
    pub fn new(
        questions: Vec<Question>,
        duration_minutes: u32,
        metadata: serde_json::Value,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let clock = SessionClock::new(duration_minutes)?;

        Ok(Self {
            attempt_id: AttemptId::generate(),
            questions,
            current: 0,
            answers: AnswerSheet::new(),
            clock,
            integrity_flags: 0,
            phase: SessionPhase::AwaitingStart,
            metadata,
            time_display: String::new(),
            receipt: None,
            failure_message: None,
        })
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current` is clamped by every navigation path.
        &self.questions[self.current]
    }

    /// The recorded response for the current question, empty when unanswered.
    #[must_use]
    pub fn current_response(&self) -> &str {
        self.answers
            .response(self.current_question().id())
            .unwrap_or("")
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn integrity_flags(&self) -> u32 {
        self.integrity_flags
    }

    #[must_use]
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Last countdown text observed; empty before the clock started.
    #[must_use]
    pub fn time_display(&self) -> &str {
        &self.time_display
    }

    #[must_use]
    pub fn is_near_expiry(&self) -> bool {
        self.clock.is_near_expiry()
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, SessionPhase::Terminated(_))
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::AwaitingStart => Err(SessionError::NotStarted),
            SessionPhase::Submitting => Err(SessionError::SubmissionInFlight),
            SessionPhase::Terminated(_) => Err(SessionError::Terminated),
        }
    }

    /// Enter the session phase once the pre-check reports ready.
    ///
    /// Starts the exam clock at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotReady` if any pre-check field is missing and
    /// `SessionError::AlreadyStarted` when called outside `AwaitingStart`.
    pub fn begin(
        &mut self,
        permissions: &PermissionState,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::AwaitingStart {
            return Err(SessionError::AlreadyStarted);
        }
        if !permissions.is_ready() {
            return Err(SessionError::NotReady);
        }

        self.clock.start(now);
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Write (or overwrite) the response for the current question.
    ///
    /// # Errors
    ///
    /// Rejected outside `InProgress`.
    pub fn select_answer(&mut self, value: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let id = self.current_question().id();
        self.answers.record(id, value);
        Ok(())
    }

    /// Move to the next question; no-op at the last one.
    ///
    /// # Errors
    ///
    /// Rejected outside `InProgress`.
    pub fn go_next(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
        Ok(())
    }

    /// Move to the previous question; no-op at the first one.
    ///
    /// # Errors
    ///
    /// Rejected outside `InProgress`.
    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Jump to any valid question index (question-navigator path).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidNavigation` for an out-of-range target,
    /// leaving the current index untouched. Rejected outside `InProgress`.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if index >= self.questions.len() {
            return Err(SessionError::InvalidNavigation {
                index,
                len: self.questions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Count one integrity flag. Never decrements.
    ///
    /// # Errors
    ///
    /// Rejected outside `InProgress`.
    pub fn record_integrity_event(&mut self) -> Result<u32, SessionError> {
        self.ensure_in_progress()?;
        self.integrity_flags += 1;
        Ok(self.integrity_flags)
    }

    /// Feed one countdown observation.
    ///
    /// Returns `None` outside `InProgress`, while the clock is idle, and
    /// after expiry. An `Expired` edge does not change the phase by itself —
    /// the caller routes it into [`AssessmentSession::begin_submission`].
    /// A `NearExpiry` edge carries no state effect beyond the latch.
    pub fn observe_clock(&mut self, now: DateTime<Utc>) -> Option<ClockTick> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let tick = self.clock.observe(now)?;
        self.time_display = tick.display.clone();
        Some(tick)
    }

    /// Fire the single-use submission latch and package the payload.
    ///
    /// Both the explicit user action and clock expiry land here; whichever
    /// arrives second is rejected without side effects.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubmissionInFlight` or
    /// `SessionError::Terminated` on a second trigger, and
    /// `SessionError::NotStarted` before the session began.
    pub fn begin_submission(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<SubmissionPayload, SessionError> {
        self.ensure_in_progress()?;
        self.phase = SessionPhase::Submitting;

        let answers = self
            .answers
            .responses()
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect();

        Ok(SubmissionPayload {
            attempt_id: self.attempt_id,
            answers,
            answered_count: self.answers.answered_count(),
            integrity_flag_count: self.integrity_flags,
            elapsed_secs: self.clock.elapsed_secs(now),
            metadata: self.metadata.clone(),
        })
    }

    /// Record the sink outcome and terminate.
    ///
    /// On failure the answer sheet stays readable for an external manual
    /// retry path; the session never reverts to `InProgress`.
    ///
    /// # Errors
    ///
    /// Rejected unless the session is `Submitting`.
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<Outcome, SessionError> {
        match self.phase {
            SessionPhase::Submitting => {}
            SessionPhase::Terminated(_) => return Err(SessionError::Terminated),
            SessionPhase::AwaitingStart | SessionPhase::InProgress => {
                return Err(SessionError::NotStarted);
            }
        }

        let outcome = match result {
            Ok(receipt) => {
                self.receipt = Some(receipt);
                Outcome::Success
            }
            Err(err) => {
                self.failure_message = Some(err.to_string());
                Outcome::Failure
            }
        };
        self.phase = SessionPhase::Terminated(outcome);
        Ok(outcome)
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("attempt_id", &self.attempt_id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("integrity_flags", &self.integrity_flags)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
