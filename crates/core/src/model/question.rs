use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::media::MediaRef;
use crate::model::answer::{AnswerToken, Choice};
use crate::model::ids::QuestionIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question points must be positive")]
    ZeroPoints,

    #[error("multiple-choice question is missing option {0}")]
    MissingChoice(Choice),
}

/// Two question classes with different exam timing and stage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Specialist,
}

/// The shape of the answer the question expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKind {
    /// Yes/no question (`"TN"` on the wire).
    YesNo,
    /// Three lettered options with their texts.
    MultipleChoice(BTreeMap<Choice, String>),
}

impl AnswerKind {
    /// Build the multiple-choice variant, requiring all three options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingChoice` when a letter has no text.
    pub fn multiple_choice(
        choices: BTreeMap<Choice, String>,
    ) -> Result<Self, QuestionError> {
        for letter in [Choice::A, Choice::B, Choice::C] {
            if !choices.contains_key(&letter) {
                return Err(QuestionError::MissingChoice(letter));
            }
        }
        Ok(AnswerKind::MultipleChoice(choices))
    }

    /// Whether the given token is a possible answer for this kind.
    #[must_use]
    pub fn accepts(&self, token: AnswerToken) -> bool {
        match (self, token) {
            (AnswerKind::YesNo, AnswerToken::Yes | AnswerToken::No) => true,
            (AnswerKind::MultipleChoice(_), AnswerToken::Choice(_)) => true,
            _ => false,
        }
    }
}

/// One quiz question as received from the service.
///
/// Immutable once constructed; a newer `QUESTION_DATA` event supersedes the
/// instance rather than mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    index: QuestionIndex,
    text: String,
    answers: AnswerKind,
    media: Option<MediaRef>,
    category: Category,
    points: u32,
    number: u32,
    error_count: u32,
}

impl Question {
    /// Validate raw parts into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is empty or points are zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: QuestionIndex,
        text: impl Into<String>,
        answers: AnswerKind,
        media: Option<MediaRef>,
        category: Category,
        points: u32,
        number: u32,
        error_count: u32,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if points == 0 {
            return Err(QuestionError::ZeroPoints);
        }

        Ok(Self {
            index,
            text,
            answers,
            media,
            category,
            points,
            number,
            error_count,
        })
    }

    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerKind {
        &self.answers
    }

    #[must_use]
    pub fn media(&self) -> Option<&MediaRef> {
        self.media.as_ref()
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Position of the question within the session, as counted by the service.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// How many questions the client has answered incorrectly so far.
    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.error_count
    }
}
