use chrono::{DateTime, Utc};

use crate::model::question::Question;

/// One incorrectly answered exam question, with the token the service
/// expected and the token that was given.
#[derive(Debug, Clone, PartialEq)]
pub struct IncorrectAttempt {
    pub question: Question,
    pub correct_answer: String,
    pub given_answer: String,
}

/// The exam result as delivered by the terminal `EXAM_FINISH` event,
/// before it is stamped into a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamOutcome {
    pub passed: bool,
    pub points: u32,
    pub incorrect: Vec<IncorrectAttempt>,
}

/// Final report of one exam attempt.
///
/// Created once at the terminal event, immutable thereafter, discarded when
/// a new attempt starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamReport {
    passed: bool,
    points: u32,
    incorrect: Vec<IncorrectAttempt>,
    finished_at: DateTime<Utc>,
}

impl ExamReport {
    #[must_use]
    pub fn from_outcome(outcome: ExamOutcome, finished_at: DateTime<Utc>) -> Self {
        Self {
            passed: outcome.passed,
            points: outcome.points,
            incorrect: outcome.incorrect,
            finished_at,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn incorrect(&self) -> &[IncorrectAttempt] {
        &self.incorrect
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}
