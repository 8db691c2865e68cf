use crate::model::{ExamOutcome, ExamReport, IncorrectAttempt};
use crate::time::Clock;

/// Holds the final outcome of an exam attempt and a cursor over its
/// incorrect attempts for one-at-a-time review.
///
/// The cursor clamps to `[0, incorrect.len() - 1]` and never wraps.
#[derive(Debug, Clone)]
pub struct ExamResultAggregator {
    clock: Clock,
    report: Option<ExamReport>,
    cursor: usize,
}

impl ExamResultAggregator {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            report: None,
            cursor: 0,
        }
    }

    /// Snapshot the terminal outcome into an immutable report and reset the
    /// cursor.
    pub fn on_exam_finished(&mut self, outcome: ExamOutcome) -> &ExamReport {
        self.cursor = 0;
        self.report
            .insert(ExamReport::from_outcome(outcome, self.clock.now()))
    }

    #[must_use]
    pub fn report(&self) -> Option<&ExamReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The incorrect attempt under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&IncorrectAttempt> {
        self.report.as_ref()?.incorrect().get(self.cursor)
    }

    /// Move the cursor forward, clamping at the last incorrect attempt.
    pub fn next(&mut self) -> usize {
        let len = self.incorrect_len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Move the cursor back, clamping at zero.
    pub fn previous(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    /// Discard the stored report so a fresh exam attempt can begin.
    pub fn restart(&mut self) {
        self.report = None;
        self.cursor = 0;
    }

    fn incorrect_len(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.incorrect().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnswerKind, Category, Question, QuestionIndex,
    };
    use crate::time::fixed_clock;

    fn attempt(index: u64) -> IncorrectAttempt {
        IncorrectAttempt {
            question: Question::new(
                QuestionIndex::new(index),
                format!("q{index}"),
                AnswerKind::YesNo,
                None,
                Category::Basic,
                1,
                0,
                0,
            )
            .unwrap(),
            correct_answer: "T".to_string(),
            given_answer: "N".to_string(),
        }
    }

    fn outcome(incorrect: Vec<IncorrectAttempt>) -> ExamOutcome {
        ExamOutcome {
            passed: false,
            points: 60,
            incorrect,
        }
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut agg = ExamResultAggregator::new(fixed_clock());
        agg.on_exam_finished(outcome(vec![attempt(1), attempt(2)]));

        assert_eq!(agg.cursor(), 0);
        assert_eq!(agg.previous(), 0);
        assert_eq!(agg.next(), 1);
        assert_eq!(agg.next(), 1);
        assert_eq!(agg.current().unwrap().question.index(), QuestionIndex::new(2));
        assert_eq!(agg.previous(), 0);
    }

    #[test]
    fn empty_incorrect_list_keeps_cursor_at_zero() {
        let mut agg = ExamResultAggregator::new(fixed_clock());
        agg.on_exam_finished(outcome(Vec::new()));
        assert_eq!(agg.next(), 0);
        assert_eq!(agg.previous(), 0);
        assert!(agg.current().is_none());
    }

    #[test]
    fn new_outcome_replaces_report_and_resets_cursor() {
        let mut agg = ExamResultAggregator::new(fixed_clock());
        agg.on_exam_finished(outcome(vec![attempt(1), attempt(2)]));
        agg.next();

        agg.on_exam_finished(outcome(vec![attempt(3)]));
        assert_eq!(agg.cursor(), 0);
        assert_eq!(agg.report().unwrap().incorrect().len(), 1);
    }

    #[test]
    fn restart_discards_the_report() {
        let mut agg = ExamResultAggregator::new(fixed_clock());
        agg.on_exam_finished(outcome(vec![attempt(1)]));
        agg.restart();
        assert!(agg.report().is_none());
        assert_eq!(agg.cursor(), 0);
    }
}
