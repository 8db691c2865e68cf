use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerTokenError {
    #[error("unknown answer token: {0:?}")]
    Unknown(String),
}

/// One of the three lettered options of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
}

impl Choice {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = AnswerTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Choice::A),
            "B" => Ok(Choice::B),
            "C" => Ok(Choice::C),
            other => Err(AnswerTokenError::Unknown(other.to_string())),
        }
    }
}

/// A single answer the user can pick for the current question.
///
/// Wire tokens follow the question service: `"T"`/`"N"` for yes/no
/// questions, the bare letter for multiple-choice ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerToken {
    Yes,
    No,
    Choice(Choice),
}

impl AnswerToken {
    /// Token string sent in a `CHECK_ANSWER` message.
    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            AnswerToken::Yes => "T",
            AnswerToken::No => "N",
            AnswerToken::Choice(c) => c.as_str(),
        }
    }
}

impl fmt::Display for AnswerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AnswerToken {
    type Err = AnswerTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T" => Ok(AnswerToken::Yes),
            "N" => Ok(AnswerToken::No),
            other => other.parse::<Choice>().map(AnswerToken::Choice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_wire_roundtrip() {
        for token in [
            AnswerToken::Yes,
            AnswerToken::No,
            AnswerToken::Choice(Choice::B),
        ] {
            let parsed: AnswerToken = token.as_wire().parse().unwrap();
            assert_eq!(parsed, token);
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(
            "D".parse::<AnswerToken>(),
            Err(AnswerTokenError::Unknown("D".to_string()))
        );
    }
}
