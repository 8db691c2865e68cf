use thiserror::Error;

use crate::media::MediaError;
use crate::model::{AnswerTokenError, QuestionError};
use crate::protocol::ProtocolError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    AnswerToken(#[from] AnswerTokenError),
    #[error(transparent)]
    Media(#[from] MediaError),
}
