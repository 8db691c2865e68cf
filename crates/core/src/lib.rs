#![forbid(unsafe_code)]

pub mod aggregator;
pub mod controller;
pub mod error;
pub mod media;
pub mod model;
pub mod protocol;
pub mod sequencer;
pub mod time;

pub use error::Error;
pub use time::Clock;

pub use aggregator::ExamResultAggregator;
pub use controller::{
    ADVANCE_DELAY, AnswerFeedback, Effect, Phase, SessionController, SessionEvent,
};
pub use sequencer::{SequenceStage, StageAction, StageTimer, TimedActionSequencer};
