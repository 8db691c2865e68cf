use serde::{Deserialize, Serialize};
use std::fmt;

/// Path segment used before the service has assigned an identity.
pub const ANON_IDENTITY: &str = "anon";

/// Opaque token identifying a returning user/device to the question service.
///
/// Issued via `SET_CLIENT_ID` on first contact, persisted by the host
/// application and replayed on reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Wraps a raw token. Returns `None` for an empty or whitespace token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
