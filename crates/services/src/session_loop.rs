//! Drives one session: a single task that feeds the controller from the
//! connection, user commands and timer expiries, then performs the effects
//! it returns.
//!
//! One input is fully processed (transition plus side effects) before the
//! next is taken, so no two events ever interleave for the same session.
//! Countdown timers are spawned sleeps that report back through an internal
//! channel; a timer racing a manual trigger is resolved by the controller's
//! guards. Every firing carries the epoch of the arm that created it, so a
//! firing that was already queued when its timer got cancelled (stage
//! indexes restart at 0 for every question) is dropped instead of hitting a
//! newer question's stage.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use quiz_core::aggregator::ExamResultAggregator;
use quiz_core::controller::{Effect, SessionController, SessionEvent};
use quiz_core::model::{AnswerToken, Mode};
use quiz_core::sequencer::StageTimer;
use quiz_core::time::Clock;
use storage::PreferenceStore;

use crate::connection::{InboundEvent, SessionChannel};
use crate::error::ConnectionError;
use crate::session_view::{PresentationCue, SessionView};

/// Actions the host forwards from the user.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SelectAnswer(AnswerToken),
    /// Submit the current selection (practice mode).
    Submit,
    /// Click the active stage's timer button (exam mode).
    TriggerStage,
    PauseStage,
    ResumeStage,
    /// The question's media finished playing.
    MediaEnded,
    /// Move the report cursor forward.
    NextIncorrect,
    /// Move the report cursor back.
    PreviousIncorrect,
    /// Discard the exam report and end so the host can start a fresh
    /// attempt on a new connection.
    Restart,
    /// Leave the quiz view.
    End,
}

/// Why the loop returned without a connection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The user left the quiz view.
    Ended,
    /// The user asked for a fresh exam attempt; open a new session.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerFired {
    Stage { epoch: u64, index: usize },
    Advance { epoch: u64 },
}

/// Host-side handle: send commands in, watch view snapshots out.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<UserCommand>,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Forward a user action. Returns false once the loop has exited.
    pub fn command(&self, command: UserCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    #[must_use]
    pub fn view(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }
}

struct StageTimerTask {
    epoch: u64,
    handle: JoinHandle<()>,
    armed_at: Instant,
}

struct AdvanceTimerTask {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// The session runtime. Construct with [`SessionLoop::new`], then await
/// [`SessionLoop::run`].
pub struct SessionLoop {
    controller: SessionController,
    aggregator: ExamResultAggregator,
    channel: Box<dyn SessionChannel>,
    inbound: mpsc::UnboundedReceiver<InboundEvent>,
    commands: mpsc::UnboundedReceiver<UserCommand>,
    store: Arc<dyn PreferenceStore>,
    view_tx: watch::Sender<SessionView>,
    timer_tx: mpsc::UnboundedSender<TimerFired>,
    timer_rx: mpsc::UnboundedReceiver<TimerFired>,
    stage_timer: Option<StageTimerTask>,
    advance_timer: Option<AdvanceTimerTask>,
    /// Bumped on every arm; firings from earlier epochs are stale.
    timer_epoch: u64,
    cue_seq: u64,
}

impl SessionLoop {
    #[must_use]
    pub fn new(
        mode: Mode,
        channel: Box<dyn SessionChannel>,
        inbound: mpsc::UnboundedReceiver<InboundEvent>,
        store: Arc<dyn PreferenceStore>,
        clock: Clock,
    ) -> (Self, SessionHandle) {
        let controller = SessionController::new(mode);
        let aggregator = ExamResultAggregator::new(clock);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) =
            watch::channel(SessionView::snapshot(&controller, &aggregator, None, 0));

        let handle = SessionHandle {
            commands: commands_tx,
            view: view_rx,
        };
        let session = Self {
            controller,
            aggregator,
            channel,
            inbound,
            commands: commands_rx,
            store,
            view_tx,
            timer_tx,
            timer_rx,
            stage_timer: None,
            advance_timer: None,
            timer_epoch: 0,
            cue_seq: 0,
        };
        (session, handle)
    }

    /// Run the session to completion.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` when the transport fails; that is fatal to
    /// the session and the host should restart.
    pub async fn run(mut self) -> Result<LoopExit, ConnectionError> {
        if let Err(err) = self.dispatch(SessionEvent::SessionStarted).await {
            self.teardown().await;
            return Err(err);
        }

        loop {
            let step = tokio::select! {
                inbound = self.inbound.recv() => match inbound {
                    Some(InboundEvent::Server(event)) => {
                        self.dispatch(SessionEvent::Server(event)).await
                    }
                    Some(InboundEvent::Fatal(err)) => Err(err),
                    None => Err(ConnectionError::Closed),
                },
                Some(fired) = self.timer_rx.recv() => {
                    match self.on_timer_fired(fired) {
                        Some(event) => self.dispatch(event).await,
                        None => Ok(()),
                    }
                }
                command = self.commands.recv() => {
                    let command = command.unwrap_or(UserCommand::End);
                    match self.on_command(command).await {
                        Ok(Some(exit)) => {
                            self.teardown().await;
                            return Ok(exit);
                        }
                        Ok(None) => Ok(()),
                        Err(err) => Err(err),
                    }
                }
            };

            if let Err(err) = step {
                tracing::warn!(%err, "session connection lost");
                self.teardown().await;
                return Err(err);
            }
        }
    }

    async fn on_command(
        &mut self,
        command: UserCommand,
    ) -> Result<Option<LoopExit>, ConnectionError> {
        match command {
            UserCommand::SelectAnswer(token) => {
                self.dispatch(SessionEvent::AnswerSelected(token)).await?;
            }
            UserCommand::Submit => self.dispatch(SessionEvent::SubmitRequested).await?,
            UserCommand::TriggerStage => self.dispatch(SessionEvent::StageTriggered).await?,
            UserCommand::PauseStage => {
                if let Some(task) = self.stage_timer.take() {
                    task.handle.abort();
                    let elapsed = task.armed_at.elapsed();
                    self.dispatch(SessionEvent::StagePaused(elapsed)).await?;
                }
            }
            UserCommand::ResumeStage => self.dispatch(SessionEvent::StageResumed).await?,
            UserCommand::MediaEnded => self.dispatch(SessionEvent::MediaEnded).await?,
            UserCommand::NextIncorrect => {
                self.aggregator.next();
                self.publish(None);
            }
            UserCommand::PreviousIncorrect => {
                self.aggregator.previous();
                self.publish(None);
            }
            UserCommand::Restart => {
                self.aggregator.restart();
                self.controller.reset();
                self.publish(None);
                return Ok(Some(LoopExit::Restart));
            }
            UserCommand::End => return Ok(Some(LoopExit::Ended)),
        }
        Ok(None)
    }

    /// A firing is only valid while its arm is still the live one; anything
    /// else was already cancelled or superseded and must not reach the
    /// controller, where a new question's stage would answer to the old
    /// question's timer.
    fn on_timer_fired(&mut self, fired: TimerFired) -> Option<SessionEvent> {
        match fired {
            TimerFired::Stage { epoch, index } => {
                let live = self
                    .stage_timer
                    .as_ref()
                    .is_some_and(|task| task.epoch == epoch);
                if !live {
                    return None;
                }
                self.stage_timer = None;
                Some(SessionEvent::StageExpired(index))
            }
            TimerFired::Advance { epoch } => {
                let live = self
                    .advance_timer
                    .as_ref()
                    .is_some_and(|task| task.epoch == epoch);
                if !live {
                    return None;
                }
                self.advance_timer = None;
                Some(SessionEvent::AdvanceDelayElapsed)
            }
        }
    }

    async fn dispatch(&mut self, event: SessionEvent) -> Result<(), ConnectionError> {
        let effects = self.controller.handle(event);
        self.apply(effects).await
    }

    async fn apply(&mut self, effects: Vec<Effect>) -> Result<(), ConnectionError> {
        let mut cue = None;
        for effect in effects {
            match effect {
                Effect::Send(event) => self.channel.send(event).await?,
                Effect::ArmStage(timer) => self.arm_stage(timer),
                Effect::ScheduleAdvance(delay) => self.schedule_advance(delay),
                Effect::CancelTimers => self.cancel_timers(),
                Effect::PersistIdentity(identity) => {
                    if let Err(err) = self.store.set_client_identity(&identity).await {
                        tracing::warn!(%err, "failed to persist client identity");
                    }
                }
                Effect::PublishReport(outcome) => {
                    self.aggregator.on_exam_finished(outcome);
                }
                Effect::RevealMedia(media) => cue = Some(PresentationCue::RevealMedia(media)),
                Effect::SignalAdvanceAnimation => cue = Some(PresentationCue::AdvanceAnimation),
                Effect::RejectEmptySelection => {
                    cue = Some(PresentationCue::RejectedEmptySelection);
                }
            }
        }
        self.publish(cue);
        Ok(())
    }

    fn arm_stage(&mut self, timer: StageTimer) {
        if let Some(task) = self.stage_timer.take() {
            task.handle.abort();
        }
        self.timer_epoch += 1;
        let epoch = self.timer_epoch;
        let tx = self.timer_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timer.duration).await;
            let _ = tx.send(TimerFired::Stage {
                epoch,
                index: timer.index,
            });
        });
        self.stage_timer = Some(StageTimerTask {
            epoch,
            handle,
            armed_at: Instant::now(),
        });
    }

    fn schedule_advance(&mut self, delay: Duration) {
        if let Some(task) = self.advance_timer.take() {
            task.handle.abort();
        }
        self.timer_epoch += 1;
        let epoch = self.timer_epoch;
        let tx = self.timer_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(TimerFired::Advance { epoch });
        });
        self.advance_timer = Some(AdvanceTimerTask { epoch, handle });
    }

    fn cancel_timers(&mut self) {
        if let Some(task) = self.stage_timer.take() {
            task.handle.abort();
        }
        if let Some(task) = self.advance_timer.take() {
            task.handle.abort();
        }
    }

    fn publish(&mut self, cue: Option<PresentationCue>) {
        if cue.is_some() {
            self.cue_seq += 1;
        }
        let view = SessionView::snapshot(&self.controller, &self.aggregator, cue, self.cue_seq);
        let _ = self.view_tx.send(view);
    }

    async fn teardown(&mut self) {
        self.cancel_timers();
        self.channel.close().await;
    }
}
