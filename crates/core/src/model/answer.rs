use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::QuestionId;

/// Per-question raw responses for one attempt.
///
/// Keys need not cover every question; the last write wins per key. The sheet
/// never drops a recorded value except by overwriting that same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    responses: HashMap<QuestionId, String>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the response for one question.
    pub fn record(&mut self, question_id: QuestionId, value: impl Into<String>) {
        self.responses.insert(question_id, value.into());
    }

    /// The recorded response for a question, if any.
    #[must_use]
    pub fn response(&self, question_id: QuestionId) -> Option<&str> {
        self.responses.get(&question_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.responses.contains_key(&question_id)
    }

    /// Number of distinct questions with a recorded response.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Read-only view of all recorded responses.
    #[must_use]
    pub fn responses(&self) -> &HashMap<QuestionId, String> {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_per_key() {
        let mut sheet = AnswerSheet::new();
        assert!(sheet.is_empty());
        sheet.record(QuestionId::new(1), "A");
        sheet.record(QuestionId::new(1), "B");

        assert_eq!(sheet.response(QuestionId::new(1)), Some("B"));
        assert_eq!(sheet.answered_count(), 1);
    }

    #[test]
    fn unrelated_writes_never_drop_existing_values() {
        let mut sheet = AnswerSheet::new();
        sheet.record(QuestionId::new(1), "A");
        sheet.record(QuestionId::new(3), "C");
        sheet.record(QuestionId::new(3), "C2");

        assert_eq!(sheet.response(QuestionId::new(1)), Some("A"));
        assert_eq!(sheet.response(QuestionId::new(2)), None);
        assert_eq!(sheet.response(QuestionId::new(3)), Some("C2"));
        assert!(!sheet.is_answered(QuestionId::new(2)));
        assert!(!sheet.is_empty());
        assert_eq!(sheet.answered_count(), 2);
    }
}
