use assess_core::model::{Difficulty, QuestionId, QuestionKind};

use super::service::{AssessmentSession, Outcome, SessionPhase};

/// Navigator state of one question slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Unanswered,
}

/// One row of the question-navigator panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorEntry {
    pub index: usize,
    pub question_id: QuestionId,
    pub status: QuestionStatus,
}

/// Read-only projection of session state for a presentation layer.
///
/// Snapshots are cheap to clone and carry everything the exam screen shows:
/// the current question, the countdown text, navigator states, progress,
/// the integrity flag badge, and the terminal outcome fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub current_index: usize,
    pub total_questions: usize,
    pub kind: QuestionKind,
    pub prompt: String,
    pub choices: Vec<String>,
    pub skill: String,
    pub difficulty: Difficulty,
    pub current_response: String,
    pub navigator: Vec<NavigatorEntry>,
    pub answered_count: usize,
    pub time_display: String,
    pub near_expiry: bool,
    pub integrity_flags: u32,
    pub result_id: Option<String>,
    pub failure_message: Option<String>,
}

impl SessionView {
    /// Snapshot the session.
    #[must_use]
    pub fn project(session: &AssessmentSession) -> Self {
        let question = session.current_question();
        let navigator = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let status = if index == session.current_index() {
                    QuestionStatus::Current
                } else if session.answers().is_answered(q.id()) {
                    QuestionStatus::Answered
                } else {
                    QuestionStatus::Unanswered
                };
                NavigatorEntry {
                    index,
                    question_id: q.id(),
                    status,
                }
            })
            .collect();

        Self {
            phase: session.phase(),
            current_index: session.current_index(),
            total_questions: session.total_questions(),
            kind: question.kind(),
            prompt: question.prompt().to_string(),
            choices: question.choices().to_vec(),
            skill: question.skill().to_string(),
            difficulty: question.difficulty(),
            current_response: session.current_response().to_string(),
            navigator,
            answered_count: session.answers().answered_count(),
            time_display: session.time_display().to_string(),
            near_expiry: session.is_near_expiry(),
            integrity_flags: session.integrity_flags(),
            result_id: session
                .receipt()
                .and_then(|receipt| receipt.result_id.clone()),
            failure_message: session.failure_message().map(str::to_string),
        }
    }

    /// Questions still without a recorded answer.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.total_questions.saturating_sub(self.answered_count)
    }

    /// Completion percentage by position, as shown in the progress bar.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        ((self.current_index + 1) as f64 / self.total_questions as f64) * 100.0
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            SessionPhase::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }
}
