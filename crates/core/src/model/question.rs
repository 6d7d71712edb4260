use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("single-choice question needs at least two choices, got {got}")]
    TooFewChoices { got: usize },

    #[error("free-text question must not carry choices")]
    UnexpectedChoices,
}

/// How a question expects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    SingleChoice,
    FreeText,
}

/// Authoring-assigned difficulty tag, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One question of an assessment. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    prompt: String,
    choices: Vec<String>,
    skill: String,
    difficulty: Difficulty,
}

impl Question {
    /// Build a single-choice question with an ordered list of choice labels.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank and
    /// `QuestionError::TooFewChoices` for fewer than two choices.
    pub fn single_choice(
        id: QuestionId,
        prompt: impl Into<String>,
        choices: Vec<String>,
        skill: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices { got: choices.len() });
        }

        Ok(Self {
            id,
            kind: QuestionKind::SingleChoice,
            prompt,
            choices,
            skill: skill.into(),
            difficulty,
        })
    }

    /// Build a free-text (subjective) question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    pub fn free_text(
        id: QuestionId,
        prompt: impl Into<String>,
        skill: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        Ok(Self {
            id,
            kind: QuestionKind::FreeText,
            prompt,
            choices: Vec::new(),
            skill: skill.into(),
            difficulty,
        })
    }

    /// Rehydrate a question from an external question source.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnexpectedChoices` if a free-text question
    /// carries choices, otherwise the same validation as the constructors.
    pub fn from_parts(
        id: QuestionId,
        kind: QuestionKind,
        prompt: impl Into<String>,
        choices: Vec<String>,
        skill: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        match kind {
            QuestionKind::SingleChoice => {
                Self::single_choice(id, prompt, choices, skill, difficulty)
            }
            QuestionKind::FreeText => {
                if !choices.is_empty() {
                    return Err(QuestionError::UnexpectedChoices);
                }
                Self::free_text(id, prompt, skill, difficulty)
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Ordered choice labels; empty for free-text questions.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn skill(&self) -> &str {
        &self.skill
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_choice_requires_choices() {
        let err = Question::single_choice(
            QuestionId::new(1),
            "Pick one",
            vec!["only".to_string()],
            "General",
            Difficulty::Easy,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::TooFewChoices { got: 1 });
    }

    #[test]
    fn blank_prompt_rejected() {
        let err = Question::free_text(QuestionId::new(1), "   ", "General", Difficulty::Hard)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn free_text_with_choices_rejected() {
        let err = Question::from_parts(
            QuestionId::new(3),
            QuestionKind::FreeText,
            "Explain normalization",
            vec!["A".to_string()],
            "Databases",
            Difficulty::Hard,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnexpectedChoices);
    }

    #[test]
    fn accessors_round_trip() {
        let q = Question::single_choice(
            QuestionId::new(2),
            "Which is NOT a valid HTTP status code?",
            vec!["200", "404", "500", "999"]
                .into_iter()
                .map(String::from)
                .collect(),
            "Web Development",
            Difficulty::Easy,
        )
        .unwrap();

        assert_eq!(q.id(), QuestionId::new(2));
        assert_eq!(q.kind(), QuestionKind::SingleChoice);
        assert_eq!(q.choices().len(), 4);
        assert_eq!(q.skill(), "Web Development");
        assert_eq!(q.difficulty(), Difficulty::Easy);
    }
}
