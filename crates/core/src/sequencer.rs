//! Ordered timed stages for one exam question.
//!
//! The sequencer is pure state: it tracks which stage is active, how much of
//! its countdown remains, and which stages have already fired. The embedding
//! runtime owns the real timers and reports expiry via [`TimedActionSequencer::expire`].
//! A stage's action fires exactly once, from expiry or a manual trigger,
//! never both.

use std::time::Duration;

use crate::model::Category;

pub const START_STAGE_SECS: u64 = 20;
pub const ADVANCE_STAGE_SECS: u64 = 15;
pub const SPECIALIST_STAGE_SECS: u64 = 50;

/// What firing a stage means to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// Reveal/start the question's media ("Start").
    RevealMedia,
    /// Submit whatever answer is selected and move on ("Advance").
    SubmitAnswer,
}

/// One timed phase of an exam question's interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStage {
    label: &'static str,
    duration: Duration,
    action: StageAction,
}

impl SequenceStage {
    #[must_use]
    pub fn new(label: &'static str, seconds: u64, action: StageAction) -> Self {
        Self {
            label,
            duration: Duration::from_secs(seconds),
            action,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn action(&self) -> StageAction {
        self.action
    }
}

/// Stage list for an exam question of the given category.
///
/// Basic questions get a reveal stage and an answer stage; specialist
/// questions go straight to a single, longer answer stage.
#[must_use]
pub fn stage_plan(category: Category) -> Vec<SequenceStage> {
    match category {
        Category::Basic => vec![
            SequenceStage::new("Start", START_STAGE_SECS, StageAction::RevealMedia),
            SequenceStage::new("Advance", ADVANCE_STAGE_SECS, StageAction::SubmitAnswer),
        ],
        Category::Specialist => vec![SequenceStage::new(
            "Advance",
            SPECIALIST_STAGE_SECS,
            StageAction::SubmitAnswer,
        )],
    }
}

/// Instruction for the runtime to arm a countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimer {
    pub index: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Idle,
    Running { remaining: Duration },
    Paused { remaining: Duration },
}

/// Drives an ordered list of [`SequenceStage`]s.
///
/// The active index is monotonic non-decreasing for the lifetime of one
/// question; a new question gets a fresh sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedActionSequencer {
    stages: Vec<SequenceStage>,
    active: usize,
    fired: Vec<bool>,
    countdown: CountdownState,
}

impl TimedActionSequencer {
    #[must_use]
    pub fn new(stages: Vec<SequenceStage>) -> Self {
        let fired = vec![false; stages.len()];
        Self {
            stages,
            active: 0,
            fired,
            countdown: CountdownState::Idle,
        }
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_stage(&self) -> Option<&SequenceStage> {
        self.stages.get(self.active)
    }

    /// All stages have fired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active >= self.stages.len()
    }

    /// Remaining countdown of the active stage, if one is running or paused.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match self.countdown {
            CountdownState::Idle => None,
            CountdownState::Running { remaining } | CountdownState::Paused { remaining } => {
                Some(remaining)
            }
        }
    }

    /// Start the active stage's countdown. Returns the timer to arm, or
    /// `None` when the stage already fired or is already counting.
    pub fn begin_active(&mut self) -> Option<StageTimer> {
        if self.is_finished() || self.countdown != CountdownState::Idle {
            return None;
        }
        let duration = self.stages[self.active].duration();
        self.countdown = CountdownState::Running {
            remaining: duration,
        };
        Some(StageTimer {
            index: self.active,
            duration,
        })
    }

    /// Manually fire the active stage.
    ///
    /// Clears the pending countdown so a racing expiry becomes a no-op, and
    /// advances to the next stage without starting its countdown; the next
    /// stage is armed explicitly once its readiness condition holds.
    pub fn trigger(&mut self) -> Option<StageAction> {
        self.fire(self.active)
    }

    /// Timer-driven fire for the given stage index. Stale indexes (a stage
    /// that already fired, or a timer outliving its stage) are ignored.
    pub fn expire(&mut self, index: usize) -> Option<StageAction> {
        if index != self.active || !matches!(self.countdown, CountdownState::Running { .. }) {
            return None;
        }
        self.fire(index)
    }

    /// Suspend the running countdown, keeping time already elapsed.
    pub fn pause(&mut self, elapsed: Duration) {
        if let CountdownState::Running { remaining } = self.countdown {
            self.countdown = CountdownState::Paused {
                remaining: remaining.saturating_sub(elapsed),
            };
        }
    }

    /// Resume a paused countdown. Returns the timer to re-arm with the
    /// preserved remainder.
    pub fn resume(&mut self) -> Option<StageTimer> {
        if let CountdownState::Paused { remaining } = self.countdown {
            self.countdown = CountdownState::Running { remaining };
            Some(StageTimer {
                index: self.active,
                duration: remaining,
            })
        } else {
            None
        }
    }

    /// Complete stages before `index` without invoking their actions, used
    /// when an external readiness signal (media ended) satisfies a stage
    /// without a click. The active index never moves backwards.
    pub fn jump_to(&mut self, index: usize) {
        if index <= self.active || index > self.stages.len() {
            return;
        }
        for fired in &mut self.fired[self.active..index] {
            *fired = true;
        }
        self.active = index;
        self.countdown = CountdownState::Idle;
    }

    fn fire(&mut self, index: usize) -> Option<StageAction> {
        let stage = self.stages.get(index)?;
        if self.fired[index] {
            return None;
        }
        let action = stage.action();
        self.fired[index] = true;
        self.active = index + 1;
        self.countdown = CountdownState::Idle;
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> TimedActionSequencer {
        TimedActionSequencer::new(stage_plan(Category::Basic))
    }

    #[test]
    fn basic_plan_has_reveal_then_answer_stage() {
        let stages = stage_plan(Category::Basic);
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].label(), "Start");
        assert_eq!(stages[0].duration(), Duration::from_secs(20));
        assert_eq!(stages[1].label(), "Advance");
        assert_eq!(stages[1].duration(), Duration::from_secs(15));
    }

    #[test]
    fn specialist_plan_has_one_long_stage() {
        let stages = stage_plan(Category::Specialist);
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].duration(), Duration::from_secs(50));
        assert_eq!(stages[0].action(), StageAction::SubmitAnswer);
    }

    #[test]
    fn manual_trigger_advances_without_arming_next_stage() {
        let mut seq = basic();
        let timer = seq.begin_active().unwrap();
        assert_eq!(timer.index, 0);

        assert_eq!(seq.trigger(), Some(StageAction::RevealMedia));
        assert_eq!(seq.active_index(), 1);
        assert_eq!(seq.remaining(), None);

        let timer = seq.begin_active().unwrap();
        assert_eq!(timer.index, 1);
        assert_eq!(timer.duration, Duration::from_secs(15));
    }

    #[test]
    fn expiry_racing_a_trigger_fires_once() {
        let mut seq = basic();
        seq.begin_active();
        assert_eq!(seq.trigger(), Some(StageAction::RevealMedia));
        // The countdown callback for stage 0 lands late.
        assert_eq!(seq.expire(0), None);
    }

    #[test]
    fn stale_expiry_for_unarmed_stage_is_ignored() {
        let mut seq = basic();
        // Stage 0 never armed; a leftover timer fires anyway.
        assert_eq!(seq.expire(0), None);
        seq.begin_active();
        assert_eq!(seq.expire(1), None);
        assert_eq!(seq.expire(0), Some(StageAction::RevealMedia));
    }

    #[test]
    fn pause_preserves_elapsed_time() {
        let mut seq = basic();
        seq.begin_active();
        seq.pause(Duration::from_secs(8));
        assert_eq!(seq.remaining(), Some(Duration::from_secs(12)));

        let timer = seq.resume().unwrap();
        assert_eq!(timer.duration, Duration::from_secs(12));
        // Resuming twice changes nothing.
        assert_eq!(seq.resume(), None);
    }

    #[test]
    fn jump_completes_earlier_stages_without_their_actions() {
        let mut seq = basic();
        seq.begin_active();
        seq.jump_to(1);
        assert_eq!(seq.active_index(), 1);
        // Stage 0 is spent; only the advance stage can still fire.
        assert_eq!(seq.expire(0), None);
        seq.begin_active();
        assert_eq!(seq.trigger(), Some(StageAction::SubmitAnswer));
        assert!(seq.is_finished());
    }

    #[test]
    fn jump_never_moves_backwards() {
        let mut seq = basic();
        seq.begin_active();
        seq.trigger();
        assert_eq!(seq.active_index(), 1);
        seq.jump_to(0);
        assert_eq!(seq.active_index(), 1);
    }
}
