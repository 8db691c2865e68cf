use std::fmt;

/// The two session modes offered by the question service.
///
/// Practice loops indefinitely at the user's pace; exam is time-boxed per
/// question and ends with a final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Practice,
    Exam,
}

impl Mode {
    /// Path segment of the WebSocket endpoint.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Practice => "practice",
            Mode::Exam => "exam",
        }
    }

    #[must_use]
    pub fn is_exam(&self) -> bool {
        matches!(self, Mode::Exam)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
