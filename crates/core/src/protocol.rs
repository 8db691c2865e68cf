//! Wire protocol of the question service.
//!
//! Messages travel as JSON envelopes `{"event": ..., "content": ...}` over
//! one WebSocket per session. Inbound payloads are deserialized into record
//! shapes first and then validated into domain types, so a malformed event
//! surfaces as a `ProtocolError` instead of a half-built `Question`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::media::MediaRef;
use crate::model::{
    ANON_IDENTITY, AnswerKind, AnswerToken, Category, ClientIdentity, ExamOutcome,
    IncorrectAttempt, Mode, Question, QuestionError, QuestionIndex, Validation,
    ValidationResult,
};

pub const EVENT_GET_QUESTION: &str = "GET_QUESTION";
pub const EVENT_CHECK_ANSWER: &str = "CHECK_ANSWER";
pub const EVENT_QUESTION_DATA: &str = "QUESTION_DATA";
pub const EVENT_SET_CLIENT_ID: &str = "SET_CLIENT_ID";
pub const EVENT_ANSWER_VALIDATION: &str = "ANSWER_VALIDATION";
pub const EVENT_EXAM_FINISH: &str = "EXAM_FINISH";

/// Shortcut token the service may send instead of a validation object.
const VALIDATION_OK: &str = "OK";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("event {0} arrived without usable content")]
    MissingContent(&'static str),

    #[error("unexpected validation content: {0:?}")]
    UnexpectedValidation(String),

    #[error("session endpoint cannot be built from the base URL")]
    InvalidEndpoint,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// The raw `{event, content}` envelope shared by both directions.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub content: Value,
}

//
// ─── OUTBOUND ──────────────────────────────────────────────────────────────────
//

/// Messages the client sends to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Request the next question.
    GetQuestion,
    /// Submit the current selection. `None` encodes the empty auto-submit
    /// an exam countdown can force.
    CheckAnswer(Option<AnswerToken>),
}

impl ClientEvent {
    #[must_use]
    pub fn into_envelope(self) -> Envelope {
        match self {
            ClientEvent::GetQuestion => Envelope {
                event: EVENT_GET_QUESTION.to_string(),
                content: Value::Null,
            },
            ClientEvent::CheckAnswer(token) => Envelope {
                event: EVENT_CHECK_ANSWER.to_string(),
                content: Value::String(
                    token.map(|t| t.as_wire().to_string()).unwrap_or_default(),
                ),
            },
        }
    }

    /// Serialize to the JSON text frame put on the socket.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Json` if serialization fails.
    pub fn to_json(self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&self.into_envelope())?)
    }
}

//
// ─── INBOUND ───────────────────────────────────────────────────────────────────
//

/// Messages the service sends to the client, already validated into domain
/// types.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    QuestionData(Question),
    ClientIdAssigned(ClientIdentity),
    AnswerValidated(Validation),
    ExamFinished(ExamOutcome),
}

impl ServerEvent {
    /// Parse one inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` for unknown events, missing or malformed
    /// content, and payloads that fail domain validation.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.event.as_str() {
            EVENT_QUESTION_DATA => {
                if envelope.content.is_null() {
                    return Err(ProtocolError::MissingContent(EVENT_QUESTION_DATA));
                }
                let payload: QuestionPayload = serde_json::from_value(envelope.content)?;
                Ok(ServerEvent::QuestionData(payload.into_question()?))
            }
            EVENT_SET_CLIENT_ID => {
                let raw: String = serde_json::from_value(envelope.content)?;
                let identity = ClientIdentity::new(raw)
                    .ok_or(ProtocolError::MissingContent(EVENT_SET_CLIENT_ID))?;
                Ok(ServerEvent::ClientIdAssigned(identity))
            }
            EVENT_ANSWER_VALIDATION => {
                let payload: ValidationPayload = serde_json::from_value(envelope.content)?;
                Ok(ServerEvent::AnswerValidated(payload.into_validation()?))
            }
            EVENT_EXAM_FINISH => {
                if envelope.content.is_null() {
                    return Err(ProtocolError::MissingContent(EVENT_EXAM_FINISH));
                }
                let payload: ExamFinishPayload = serde_json::from_value(envelope.content)?;
                Ok(ServerEvent::ExamFinished(payload.into_outcome()?))
            }
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

//
// ─── PAYLOAD RECORDS ───────────────────────────────────────────────────────────
//

/// Wire shape of a question, mirroring the service's JSON field names.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionPayload {
    pub index: u64,
    pub question: String,
    pub answers: AnswersPayload,
    #[serde(default)]
    pub media_name: String,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default, alias = "_total_hard")]
    pub error_count: u32,
}

fn default_category() -> Category {
    Category::Basic
}

fn default_points() -> u32 {
    1
}

/// The `answers` field: the literal `"TN"` marker or a letter→text map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswersPayload {
    Marker(String),
    Choices(BTreeMap<crate::model::Choice, String>),
}

impl QuestionPayload {
    /// Validate the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty text, zero points, or an
    /// incomplete choice map.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let answers = match self.answers {
            AnswersPayload::Marker(_) => AnswerKind::YesNo,
            AnswersPayload::Choices(choices) => AnswerKind::multiple_choice(choices)?,
        };
        Question::new(
            QuestionIndex::new(self.index),
            self.question,
            answers,
            MediaRef::new(self.media_name),
            self.category,
            self.points,
            self.number,
            self.error_count,
        )
    }
}

/// The `ANSWER_VALIDATION` content: `"OK"` or the full result object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValidationPayload {
    Shortcut(String),
    Result {
        is_correct: bool,
        correct_answer: String,
        #[serde(default)]
        given_answer: String,
    },
}

impl ValidationPayload {
    fn into_validation(self) -> Result<Validation, ProtocolError> {
        match self {
            ValidationPayload::Shortcut(s) if s == VALIDATION_OK => Ok(Validation::Accepted),
            ValidationPayload::Shortcut(other) => {
                Err(ProtocolError::UnexpectedValidation(other))
            }
            ValidationPayload::Result {
                is_correct,
                correct_answer,
                given_answer,
            } => Ok(Validation::Result(ValidationResult {
                is_correct,
                correct_answer,
                given_answer,
            })),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamFinishPayload {
    pub passed: bool,
    pub points: u32,
    #[serde(default)]
    pub incorrect: Vec<IncorrectEntryPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncorrectEntryPayload {
    pub question: QuestionPayload,
    pub correct_answer: String,
    #[serde(default)]
    pub given_answer: String,
}

impl ExamFinishPayload {
    fn into_outcome(self) -> Result<ExamOutcome, QuestionError> {
        let incorrect = self
            .incorrect
            .into_iter()
            .map(|entry| {
                Ok(IncorrectAttempt {
                    question: entry.question.into_question()?,
                    correct_answer: entry.correct_answer,
                    given_answer: entry.given_answer,
                })
            })
            .collect::<Result<Vec<_>, QuestionError>>()?;
        Ok(ExamOutcome {
            passed: self.passed,
            points: self.points,
            incorrect,
        })
    }
}

//
// ─── ENDPOINT ──────────────────────────────────────────────────────────────────
//

/// Build the session endpoint `ws(s)://<base>/ws/<mode>/<identity-or-anon>`.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidEndpoint` when the base URL cannot carry
/// the path.
pub fn session_endpoint(
    ws_base: &Url,
    mode: Mode,
    identity: Option<&ClientIdentity>,
) -> Result<Url, ProtocolError> {
    let who = identity.map_or(ANON_IDENTITY, ClientIdentity::as_str);
    ws_base
        .join(&format!("ws/{mode}/{who}"))
        .map_err(|_| ProtocolError::InvalidEndpoint)
}
