use std::time::Duration;

use quiz_core::aggregator::ExamResultAggregator;
use quiz_core::controller::{AnswerFeedback, Phase, SessionController};
use quiz_core::media::MediaRef;
use quiz_core::model::{AnswerToken, IncorrectAttempt, Mode, Question};

/// Presentation-agnostic snapshot of the session for renderers.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings
/// and no layout assumptions. The renderer draws whatever is here; it is
/// never the source of truth for any of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub mode: Mode,
    pub phase: Phase,
    pub question: Option<Question>,
    pub selection: Option<AnswerToken>,
    pub feedback: Option<AnswerFeedback>,
    pub stage: Option<StageView>,
    pub report: Option<ReportView>,
    /// Latest one-shot presentation cue; `cue_seq` bumps on every new cue
    /// so renderers can tell a repeat apart from a stale one.
    pub cue: Option<PresentationCue>,
    pub cue_seq: u64,
}

/// The active exam stage and its countdown parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageView {
    pub index: usize,
    pub label: &'static str,
    pub duration: Duration,
    pub remaining: Option<Duration>,
}

/// Exam report projection with the aggregator's cursor applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub passed: bool,
    pub points: u32,
    pub incorrect_total: usize,
    pub cursor: usize,
    pub current: Option<IncorrectAttempt>,
}

/// One-shot signals the renderer reacts to once.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCue {
    /// Start playing the current question's media.
    RevealMedia(MediaRef),
    /// Play the held-question advance-timeout animation.
    AdvanceAnimation,
    /// Flash the empty-selection error cue.
    RejectedEmptySelection,
}

impl SessionView {
    #[must_use]
    pub(crate) fn snapshot(
        controller: &SessionController,
        aggregator: &ExamResultAggregator,
        cue: Option<PresentationCue>,
        cue_seq: u64,
    ) -> Self {
        let stage = controller.sequencer().and_then(|seq| {
            seq.active_stage().map(|s| StageView {
                index: seq.active_index(),
                label: s.label(),
                duration: s.duration(),
                remaining: seq.remaining(),
            })
        });

        let report = aggregator.report().map(|r| ReportView {
            passed: r.passed(),
            points: r.points(),
            incorrect_total: r.incorrect().len(),
            cursor: aggregator.cursor(),
            current: aggregator.current().cloned(),
        });

        Self {
            mode: controller.mode(),
            phase: controller.phase(),
            question: controller.current_question().cloned(),
            selection: controller.selection(),
            feedback: controller.feedback().cloned(),
            stage,
            report,
            cue,
            cue_seq,
        }
    }

    /// True while the next question has been requested but not received;
    /// renderers show the loading indication instead of stale content.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::AwaitingQuestion)
    }
}
