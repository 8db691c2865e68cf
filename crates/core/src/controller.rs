//! The session state machine.
//!
//! Every input (inbound service events, user actions, timer firings) is a
//! [`SessionEvent`] consumed by [`SessionController::handle`], which mutates
//! the controller and returns the [`Effect`]s the runtime must perform. The
//! controller itself never touches a socket or a timer, which keeps the
//! whole transition table unit-testable.

use std::time::Duration;

use crate::media::MediaRef;
use crate::model::{
    AnswerToken, ClientIdentity, ExamOutcome, Mode, Question, Validation,
};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::sequencer::{StageAction, StageTimer, TimedActionSequencer, stage_plan};

/// Delay before the next question is requested after an incorrect practice
/// answer, giving the user time to read the marked answers.
pub const ADVANCE_DELAY: Duration = Duration::from_secs(3);

/// Lifecycle of one session. `SessionEnded` is terminal only for exam mode;
/// practice loops back to `AwaitingQuestion` indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingQuestion,
    QuestionActive,
    AwaitingValidation,
    SessionEnded,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The connection is established; start requesting questions.
    SessionStarted,
    /// A parsed inbound message from the service.
    Server(ServerEvent),
    /// The user picked an answer for the current question.
    AnswerSelected(AnswerToken),
    /// The user explicitly submitted (practice mode).
    SubmitRequested,
    /// The user clicked the active stage's timer button (exam mode).
    StageTriggered,
    /// A stage countdown armed for `index` reached zero.
    StageExpired(usize),
    /// The active stage countdown was suspended after `elapsed` run time.
    StagePaused(Duration),
    /// The suspended countdown should continue.
    StageResumed,
    /// The host reports the question's media finished playing.
    MediaEnded,
    /// The practice post-answer delay elapsed.
    AdvanceDelayElapsed,
}

/// Side effects the runtime performs after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Put a message on the connection.
    Send(ClientEvent),
    /// Arm a countdown for a sequencer stage.
    ArmStage(StageTimer),
    /// Schedule the delayed next-question request (practice, incorrect).
    ScheduleAdvance(Duration),
    /// Abort any pending stage/advance timers.
    CancelTimers,
    /// Store the identity assigned by the service.
    PersistIdentity(ClientIdentity),
    /// Hand the terminal exam outcome to the aggregator.
    PublishReport(ExamOutcome),
    /// Start playback of the current question's media.
    RevealMedia(MediaRef),
    /// Presentation cue: the held question is about to advance.
    SignalAdvanceAnimation,
    /// Presentation cue: submission with no answer selected was refused.
    RejectEmptySelection,
}

/// Correct/given tokens shown while an incorrectly answered practice
/// question is held on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct_answer: String,
    pub given_answer: String,
}

/// State machine for one practice or exam session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionController {
    mode: Mode,
    phase: Phase,
    question: Option<Question>,
    selection: Option<AnswerToken>,
    submitted: bool,
    feedback: Option<AnswerFeedback>,
    sequencer: Option<TimedActionSequencer>,
}

impl SessionController {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
            question: None,
            selection: None,
            submitted: false,
            feedback: None,
            sequencer: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The question currently on screen; `None` renders as the loading
    /// indication.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<AnswerToken> {
        self.selection
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn sequencer(&self) -> Option<&TimedActionSequencer> {
        self.sequencer.as_ref()
    }

    /// Discard all per-attempt state so a fresh session can start.
    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
    }

    /// Apply one event and return the effects to perform, in order.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::SessionStarted => self.on_started(),
            SessionEvent::Server(ServerEvent::QuestionData(question)) => {
                self.install_question(question)
            }
            SessionEvent::Server(ServerEvent::ClientIdAssigned(identity)) => {
                vec![Effect::PersistIdentity(identity)]
            }
            SessionEvent::Server(ServerEvent::AnswerValidated(validation)) => {
                self.on_validated(validation)
            }
            SessionEvent::Server(ServerEvent::ExamFinished(outcome)) => {
                self.on_exam_finished(outcome)
            }
            SessionEvent::AnswerSelected(token) => self.on_selected(token),
            SessionEvent::SubmitRequested => self.on_submit_requested(),
            SessionEvent::StageTriggered => {
                let action = self.sequencer.as_mut().and_then(TimedActionSequencer::trigger);
                self.on_stage_action(action)
            }
            SessionEvent::StageExpired(index) => {
                let action = self
                    .sequencer
                    .as_mut()
                    .and_then(|seq| seq.expire(index));
                self.on_stage_action(action)
            }
            SessionEvent::StagePaused(elapsed) => {
                if let Some(seq) = self.sequencer.as_mut() {
                    seq.pause(elapsed);
                }
                Vec::new()
            }
            SessionEvent::StageResumed => self
                .sequencer
                .as_mut()
                .and_then(TimedActionSequencer::resume)
                .map(Effect::ArmStage)
                .into_iter()
                .collect(),
            SessionEvent::MediaEnded => self.on_media_ended(),
            SessionEvent::AdvanceDelayElapsed => self.on_advance_elapsed(),
        }
    }

    fn on_started(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        self.phase = Phase::AwaitingQuestion;
        vec![Effect::Send(ClientEvent::GetQuestion)]
    }

    /// A new question always wins, even over a pending validation: it
    /// resets the selection, the submission guard and any running stages.
    fn install_question(&mut self, question: Question) -> Vec<Effect> {
        if self.phase == Phase::SessionEnded {
            return Vec::new();
        }

        let mut effects = vec![Effect::CancelTimers];
        self.selection = None;
        self.submitted = false;
        self.feedback = None;

        if self.mode.is_exam() {
            let mut sequencer = TimedActionSequencer::new(stage_plan(question.category()));
            if let Some(timer) = sequencer.begin_active() {
                effects.push(Effect::ArmStage(timer));
            }
            self.sequencer = Some(sequencer);
        } else {
            self.sequencer = None;
        }

        self.question = Some(question);
        self.phase = Phase::QuestionActive;
        effects
    }

    fn on_selected(&mut self, token: AnswerToken) -> Vec<Effect> {
        if self.phase != Phase::QuestionActive || self.submitted {
            return Vec::new();
        }
        let accepted = self
            .question
            .as_ref()
            .is_some_and(|q| q.answers().accepts(token));
        if accepted {
            self.selection = Some(token);
        }
        Vec::new()
    }

    fn on_submit_requested(&mut self) -> Vec<Effect> {
        if self.mode.is_exam() || self.phase != Phase::QuestionActive {
            return Vec::new();
        }
        if self.selection.is_none() {
            return vec![Effect::RejectEmptySelection];
        }
        self.submit()
    }

    fn on_stage_action(&mut self, action: Option<StageAction>) -> Vec<Effect> {
        match action {
            Some(StageAction::RevealMedia) => {
                let media = self
                    .question
                    .as_ref()
                    .and_then(Question::media)
                    .cloned();
                match media {
                    // The advance countdown starts once playback finishes.
                    Some(media) => vec![Effect::RevealMedia(media)],
                    // Nothing to wait for; arm the answer stage directly.
                    None => self.arm_active_stage(),
                }
            }
            Some(StageAction::SubmitAnswer) => {
                if self.phase != Phase::QuestionActive {
                    return Vec::new();
                }
                self.submit()
            }
            None => Vec::new(),
        }
    }

    fn on_media_ended(&mut self) -> Vec<Effect> {
        let Some(seq) = self.sequencer.as_mut() else {
            return Vec::new();
        };
        // Media ending while the reveal stage still counts down skips it.
        if seq
            .active_stage()
            .is_some_and(|stage| stage.action() == StageAction::RevealMedia)
        {
            seq.jump_to(seq.active_index() + 1);
        }
        self.arm_active_stage()
    }

    /// At-most-once guard: no matter how many triggers race, a question
    /// produces a single `CHECK_ANSWER`.
    fn submit(&mut self) -> Vec<Effect> {
        if self.submitted {
            return Vec::new();
        }
        self.submitted = true;
        self.phase = Phase::AwaitingValidation;
        vec![Effect::Send(ClientEvent::CheckAnswer(self.selection))]
    }

    fn on_validated(&mut self, validation: Validation) -> Vec<Effect> {
        if self.phase != Phase::AwaitingValidation {
            return Vec::new();
        }

        // Exam pacing is owned entirely by the sequencer; the reading delay
        // below applies to practice only.
        if self.mode.is_exam() || validation.is_correct() {
            self.phase = Phase::AwaitingQuestion;
            return vec![Effect::Send(ClientEvent::GetQuestion)];
        }

        self.phase = Phase::QuestionActive;
        if let Validation::Result(result) = validation {
            self.feedback = Some(AnswerFeedback {
                correct_answer: result.correct_answer,
                given_answer: result.given_answer,
            });
        }
        vec![
            Effect::ScheduleAdvance(ADVANCE_DELAY),
            Effect::SignalAdvanceAnimation,
        ]
    }

    fn on_advance_elapsed(&mut self) -> Vec<Effect> {
        // A stale delay callback after a newer question installed is a no-op;
        // installing clears the feedback marker.
        if self.phase != Phase::QuestionActive || self.feedback.is_none() {
            return Vec::new();
        }
        self.phase = Phase::AwaitingQuestion;
        vec![Effect::Send(ClientEvent::GetQuestion)]
    }

    fn on_exam_finished(&mut self, outcome: ExamOutcome) -> Vec<Effect> {
        if !self.mode.is_exam() || self.phase == Phase::SessionEnded {
            return Vec::new();
        }
        self.phase = Phase::SessionEnded;
        self.question = None;
        self.selection = None;
        self.sequencer = None;
        self.feedback = None;
        vec![Effect::CancelTimers, Effect::PublishReport(outcome)]
    }

    fn arm_active_stage(&mut self) -> Vec<Effect> {
        self.sequencer
            .as_mut()
            .and_then(TimedActionSequencer::begin_active)
            .map(Effect::ArmStage)
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnswerKind, Category, Choice, QuestionIndex, ValidationResult,
    };
    use crate::sequencer::{ADVANCE_STAGE_SECS, SPECIALIST_STAGE_SECS, START_STAGE_SECS};
    use std::collections::BTreeMap;

    fn yes_no(index: u64, media: Option<&str>, category: Category) -> Question {
        Question::new(
            QuestionIndex::new(index),
            format!("question {index}"),
            AnswerKind::YesNo,
            media.and_then(MediaRef::new),
            category,
            1,
            0,
            0,
        )
        .unwrap()
    }

    fn abc(index: u64) -> Question {
        let choices = BTreeMap::from([
            (Choice::A, "a".to_string()),
            (Choice::B, "b".to_string()),
            (Choice::C, "c".to_string()),
        ]);
        Question::new(
            QuestionIndex::new(index),
            format!("question {index}"),
            AnswerKind::multiple_choice(choices).unwrap(),
            None,
            Category::Specialist,
            2,
            0,
            0,
        )
        .unwrap()
    }

    fn install(controller: &mut SessionController, question: Question) -> Vec<Effect> {
        controller.handle(SessionEvent::Server(ServerEvent::QuestionData(question)))
    }

    fn incorrect() -> Validation {
        Validation::Result(ValidationResult {
            is_correct: false,
            correct_answer: "T".to_string(),
            given_answer: "N".to_string(),
        })
    }

    #[test]
    fn practice_happy_path_matches_the_wire_scenario() {
        let mut c = SessionController::new(Mode::Practice);
        assert_eq!(
            c.handle(SessionEvent::SessionStarted),
            vec![Effect::Send(ClientEvent::GetQuestion)]
        );
        assert_eq!(c.phase(), Phase::AwaitingQuestion);

        install(&mut c, yes_no(459, None, Category::Basic));
        assert_eq!(c.phase(), Phase::QuestionActive);

        c.handle(SessionEvent::AnswerSelected(AnswerToken::No));
        let effects = c.handle(SessionEvent::SubmitRequested);
        assert_eq!(
            effects,
            vec![Effect::Send(ClientEvent::CheckAnswer(Some(AnswerToken::No)))]
        );
        assert_eq!(c.phase(), Phase::AwaitingValidation);

        let effects = c.handle(SessionEvent::Server(ServerEvent::AnswerValidated(
            Validation::Result(ValidationResult {
                is_correct: true,
                correct_answer: "N".to_string(),
                given_answer: "N".to_string(),
            }),
        )));
        assert_eq!(effects, vec![Effect::Send(ClientEvent::GetQuestion)]);
        assert_eq!(c.phase(), Phase::AwaitingQuestion);
    }

    #[test]
    fn at_most_one_check_answer_per_question() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Yes));

        let first = c.handle(SessionEvent::SubmitRequested);
        let second = c.handle(SessionEvent::SubmitRequested);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn empty_practice_submission_is_rejected_locally() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));

        let effects = c.handle(SessionEvent::SubmitRequested);
        assert_eq!(effects, vec![Effect::RejectEmptySelection]);
        assert_eq!(c.phase(), Phase::QuestionActive);
    }

    #[test]
    fn incorrect_practice_answer_holds_question_and_delays_advance() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));
        c.handle(SessionEvent::AnswerSelected(AnswerToken::No));
        c.handle(SessionEvent::SubmitRequested);

        let effects = c.handle(SessionEvent::Server(ServerEvent::AnswerValidated(
            incorrect(),
        )));
        assert_eq!(
            effects,
            vec![
                Effect::ScheduleAdvance(ADVANCE_DELAY),
                Effect::SignalAdvanceAnimation,
            ]
        );
        assert_eq!(c.phase(), Phase::QuestionActive);
        assert_eq!(c.feedback().unwrap().correct_answer, "T");

        let effects = c.handle(SessionEvent::AdvanceDelayElapsed);
        assert_eq!(effects, vec![Effect::Send(ClientEvent::GetQuestion)]);
        assert_eq!(c.phase(), Phase::AwaitingQuestion);
    }

    #[test]
    fn stale_advance_delay_after_new_question_is_ignored() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));
        c.handle(SessionEvent::AnswerSelected(AnswerToken::No));
        c.handle(SessionEvent::SubmitRequested);
        c.handle(SessionEvent::Server(ServerEvent::AnswerValidated(
            incorrect(),
        )));

        install(&mut c, yes_no(2, None, Category::Basic));
        assert!(c.handle(SessionEvent::AdvanceDelayElapsed).is_empty());
        assert_eq!(c.phase(), Phase::QuestionActive);
    }

    #[test]
    fn newest_question_wins_over_pending_validation() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Yes));
        c.handle(SessionEvent::SubmitRequested);
        assert_eq!(c.phase(), Phase::AwaitingValidation);

        install(&mut c, yes_no(2, None, Category::Basic));
        assert_eq!(c.phase(), Phase::QuestionActive);
        assert_eq!(c.current_question().unwrap().index(), QuestionIndex::new(2));
        assert_eq!(c.selection(), None);

        // The guard reset: the new question can be submitted.
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Yes));
        assert_eq!(c.handle(SessionEvent::SubmitRequested).len(), 1);
    }

    #[test]
    fn replayed_question_data_resets_selection_each_time() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        let q = yes_no(7, None, Category::Basic);

        install(&mut c, q.clone());
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Yes));
        assert_eq!(c.selection(), Some(AnswerToken::Yes));

        install(&mut c, q);
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn selection_must_match_the_answer_kind() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(3));

        c.handle(SessionEvent::AnswerSelected(AnswerToken::Yes));
        assert_eq!(c.selection(), None);
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Choice(Choice::B)));
        assert_eq!(c.selection(), Some(AnswerToken::Choice(Choice::B)));
    }

    #[test]
    fn exam_basic_question_arms_the_start_stage() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        let effects = install(&mut c, yes_no(10, Some("clip.mp4"), Category::Basic));

        assert_eq!(effects[0], Effect::CancelTimers);
        let Effect::ArmStage(timer) = &effects[1] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.index, 0);
        assert_eq!(timer.duration.as_secs(), START_STAGE_SECS);
    }

    #[test]
    fn exam_specialist_question_arms_single_long_stage() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        let effects = install(&mut c, abc(11));

        let Effect::ArmStage(timer) = &effects[1] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.index, 0);
        assert_eq!(timer.duration.as_secs(), SPECIALIST_STAGE_SECS);
    }

    #[test]
    fn reveal_with_media_waits_for_playback_before_arming_advance() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(10, Some("clip.mp4"), Category::Basic));

        let effects = c.handle(SessionEvent::StageTriggered);
        assert_eq!(
            effects,
            vec![Effect::RevealMedia(MediaRef::new("clip.mp4").unwrap())]
        );

        let effects = c.handle(SessionEvent::MediaEnded);
        let Effect::ArmStage(timer) = &effects[0] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.index, 1);
        assert_eq!(timer.duration.as_secs(), ADVANCE_STAGE_SECS);
    }

    #[test]
    fn reveal_without_media_arms_advance_immediately() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(10, None, Category::Basic));

        let effects = c.handle(SessionEvent::StageTriggered);
        let Effect::ArmStage(timer) = &effects[0] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.index, 1);
        assert_eq!(timer.duration.as_secs(), ADVANCE_STAGE_SECS);
    }

    #[test]
    fn media_ending_during_reveal_countdown_skips_to_advance() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(10, Some("clip.mp4"), Category::Basic));

        // No click; playback finishes while stage 0 still counts down.
        let effects = c.handle(SessionEvent::MediaEnded);
        let Effect::ArmStage(timer) = &effects[0] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.index, 1);

        // The leftover stage-0 timer is now stale.
        assert!(c.handle(SessionEvent::StageExpired(0)).is_empty());
    }

    #[test]
    fn exam_expiry_submits_with_empty_selection() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(11));

        let effects = c.handle(SessionEvent::StageExpired(0));
        assert_eq!(
            effects,
            vec![Effect::Send(ClientEvent::CheckAnswer(None))]
        );
        assert_eq!(c.phase(), Phase::AwaitingValidation);
    }

    #[test]
    fn exam_trigger_racing_expiry_submits_once() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(11));
        c.handle(SessionEvent::AnswerSelected(AnswerToken::Choice(Choice::A)));

        let first = c.handle(SessionEvent::StageTriggered);
        let second = c.handle(SessionEvent::StageExpired(0));
        assert_eq!(
            first,
            vec![Effect::Send(ClientEvent::CheckAnswer(Some(
                AnswerToken::Choice(Choice::A)
            )))]
        );
        assert!(second.is_empty());
    }

    #[test]
    fn exam_validation_always_requests_next_question_immediately() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(11));
        c.handle(SessionEvent::StageExpired(0));

        let effects = c.handle(SessionEvent::Server(ServerEvent::AnswerValidated(
            incorrect(),
        )));
        assert_eq!(effects, vec![Effect::Send(ClientEvent::GetQuestion)]);
        assert_eq!(c.phase(), Phase::AwaitingQuestion);
    }

    #[test]
    fn exam_finish_ends_the_session_and_publishes_the_outcome() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(11));

        let outcome = ExamOutcome {
            passed: true,
            points: 71,
            incorrect: Vec::new(),
        };
        let effects = c.handle(SessionEvent::Server(ServerEvent::ExamFinished(
            outcome.clone(),
        )));
        assert_eq!(
            effects,
            vec![Effect::CancelTimers, Effect::PublishReport(outcome)]
        );
        assert_eq!(c.phase(), Phase::SessionEnded);
        assert!(c.current_question().is_none());

        // No further requests until an explicit reset.
        assert!(install(&mut c, abc(12)).is_empty());
        c.reset();
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn exam_finish_in_practice_mode_is_ignored() {
        let mut c = SessionController::new(Mode::Practice);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, yes_no(1, None, Category::Basic));

        let effects = c.handle(SessionEvent::Server(ServerEvent::ExamFinished(
            ExamOutcome {
                passed: false,
                points: 0,
                incorrect: Vec::new(),
            },
        )));
        assert!(effects.is_empty());
        assert_eq!(c.phase(), Phase::QuestionActive);
    }

    #[test]
    fn assigned_identity_is_persisted() {
        let mut c = SessionController::new(Mode::Practice);
        let identity = ClientIdentity::new("c-99").unwrap();
        let effects = c.handle(SessionEvent::Server(ServerEvent::ClientIdAssigned(
            identity.clone(),
        )));
        assert_eq!(effects, vec![Effect::PersistIdentity(identity)]);
    }

    #[test]
    fn pause_and_resume_rearm_with_the_remainder() {
        let mut c = SessionController::new(Mode::Exam);
        c.handle(SessionEvent::SessionStarted);
        install(&mut c, abc(11));

        c.handle(SessionEvent::StagePaused(Duration::from_secs(20)));
        let effects = c.handle(SessionEvent::StageResumed);
        let Effect::ArmStage(timer) = &effects[0] else {
            panic!("expected ArmStage, got {effects:?}");
        };
        assert_eq!(timer.duration.as_secs(), SPECIALIST_STAGE_SECS - 20);
    }
}
