/// Outcome of submitting an answer, as reported by the service.
///
/// Transient: consumed by the controller to decide the next transition and
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The bare `"OK"` shortcut the service may send for a correct answer.
    Accepted,
    /// Full validation detail.
    Result(ValidationResult),
}

impl Validation {
    /// Whether the submitted answer was correct.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        match self {
            Validation::Accepted => true,
            Validation::Result(r) => r.is_correct,
        }
    }
}

/// Detailed validation reply. Tokens are kept as raw wire strings since they
/// are compared by the service, never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_correct: bool,
    pub correct_answer: String,
    pub given_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_counts_as_correct() {
        assert!(Validation::Accepted.is_correct());
        assert!(
            !Validation::Result(ValidationResult {
                is_correct: false,
                correct_answer: "T".to_string(),
                given_answer: "N".to_string(),
            })
            .is_correct()
        );
    }
}
