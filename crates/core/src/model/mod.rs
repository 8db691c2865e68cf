mod answer;
mod identity;
mod ids;
mod mode;
mod question;
mod report;
mod validation;

pub use answer::{AnswerToken, AnswerTokenError, Choice};
pub use identity::{ANON_IDENTITY, ClientIdentity};
pub use ids::{ParseIndexError, QuestionIndex};
pub use mode::Mode;
pub use question::{AnswerKind, Category, Question, QuestionError};
pub use report::{ExamOutcome, ExamReport, IncorrectAttempt};
pub use validation::{Validation, ValidationResult};
