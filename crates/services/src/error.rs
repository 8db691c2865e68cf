//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::protocol::ProtocolError;

/// Errors emitted by the session connection.
///
/// All of these are fatal to the current session: the documented recovery
/// is a full client restart, never an in-place reconnect.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    #[error(transparent)]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection closed by the service")]
    Closed,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error("account request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
