use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};

use quiz_core::model::{PlaybackSettings, Question, Quiz};
use quiz_core::playback::{Effect, Player, PlayerState, QuizResult};

use super::cues::CueSink;
use super::prepare::prepare_quiz;
use crate::error::PlaybackError;

/// Countdown resolution.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Pause between an answer and the next question when auto-advance is on.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

/// What the player screen can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Start,
    Select(usize),
    Advance,
    Restart,
    Home,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only view of the player, published after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub title: String,
    pub description: Option<String>,
    pub settings: PlaybackSettings,
    pub total: usize,
    pub state: PlayerState,
    /// Question on screen while playing.
    pub question: Option<Question>,
}

impl PlaybackSnapshot {
    #[must_use]
    pub fn from_player(player: &Player) -> Self {
        let quiz = player.quiz();
        Self {
            title: quiz.title().to_owned(),
            description: quiz.description().map(ToOwned::to_owned),
            settings: *player.settings(),
            total: player.total_questions(),
            state: player.state().clone(),
            question: player.current_question().cloned(),
        }
    }

    #[must_use]
    pub fn is_menu(&self) -> bool {
        matches!(self.state, PlayerState::Menu)
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            PlayerState::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// 1-based number of the question on screen.
    #[must_use]
    pub fn question_number(&self) -> Option<usize> {
        match &self.state {
            PlayerState::Playing(session) => Some(session.current_index() + 1),
            _ => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        match &self.state {
            PlayerState::Menu => 0,
            PlayerState::Playing(session) => session.score(),
            PlayerState::Finished(result) => result.score(),
        }
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        matches!(&self.state, PlayerState::Playing(session) if session.locked())
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        match &self.state {
            PlayerState::Playing(session) if self.settings.timer_enabled() => {
                Some(session.remaining_seconds())
            }
            _ => None,
        }
    }
}

//
// ─── DRIVER ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy)]
enum DriverEvent {
    Tick(u64),
    AutoAdvance(usize),
}

/// Owns a `Player` and carries out the effects it returns.
///
/// Timer and auto-advance tasks report back through an internal channel.
/// Every event is tagged with the epoch of the player it was scheduled for,
/// so events from a replaced player are dropped.
struct PlaybackDriver {
    source: Quiz,
    player: Player,
    epoch: u64,
    cues: Arc<dyn CueSink>,
    events: mpsc::UnboundedSender<(u64, DriverEvent)>,
    snapshots: watch::Sender<PlaybackSnapshot>,
    timer: Option<JoinHandle<()>>,
    pending_advance: Option<JoinHandle<()>>,
}

impl PlaybackDriver {
    fn new(
        source: Quiz,
        cues: Arc<dyn CueSink>,
        events: mpsc::UnboundedSender<(u64, DriverEvent)>,
    ) -> (Self, watch::Receiver<PlaybackSnapshot>) {
        let player = Player::new(Arc::new(source.clone()));
        let (snapshots, rx) = watch::channel(PlaybackSnapshot::from_player(&player));
        let driver = Self {
            source,
            player,
            epoch: 0,
            cues,
            events,
            snapshots,
            timer: None,
            pending_advance: None,
        };
        (driver, rx)
    }

    fn handle(&mut self, command: PlaybackCommand) {
        log::debug!("playback command {command:?}");
        let effects = match command {
            PlaybackCommand::Start => {
                if matches!(self.player.state(), PlayerState::Menu) {
                    self.begin_round();
                    self.reprepare();
                }
                self.player.start()
            }
            PlaybackCommand::Select(index) => self.player.select_answer(index),
            PlaybackCommand::Advance => {
                self.cancel_pending_advance();
                self.player.advance()
            }
            PlaybackCommand::Restart => {
                self.begin_round();
                self.reprepare();
                self.player.restart()
            }
            PlaybackCommand::Home => {
                self.begin_round();
                self.player.reset()
            }
        };
        self.apply(effects);
    }

    fn on_event(&mut self, epoch: u64, event: DriverEvent) {
        if epoch != self.epoch {
            return;
        }
        let effects = match event {
            DriverEvent::Tick(generation) => self.player.tick(generation),
            DriverEvent::AutoAdvance(index) => {
                self.pending_advance = None;
                self.player.advance_from(index)
            }
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmTimer {
                    generation,
                    seconds,
                } => self.arm_timer(generation, seconds),
                Effect::CancelTimer => self.cancel_timer(),
                Effect::ScheduleAdvance { index } => self.schedule_advance(index),
                Effect::AwaitAdvance => {}
                Effect::Speak(text) => self.cues.speak(&text),
                Effect::Cue(cue) => self.cues.cue(cue),
                Effect::Finished(result) => log::info!(
                    "quiz {:?} finished: {}/{} ({}%)",
                    self.source.title(),
                    result.score(),
                    result.total(),
                    result.percentage()
                ),
            }
        }
        self.snapshots
            .send_replace(PlaybackSnapshot::from_player(&self.player));
    }

    // Every play-through gets its own epoch, so timer and advance events
    // scheduled by an earlier one are dropped even when the player is reused.
    fn begin_round(&mut self) {
        self.cancel_timer();
        self.cancel_pending_advance();
        self.epoch += 1;
    }

    // Fresh shuffle for each play-through.
    fn reprepare(&mut self) {
        let settings = self.source.settings();
        if !settings.shuffle_questions() && !settings.shuffle_options() {
            return;
        }
        let prepared = prepare_quiz(&self.source, &mut rand::rng());
        self.player = Player::new(Arc::new(prepared));
    }

    fn arm_timer(&mut self, generation: u64, seconds: u32) {
        self.cancel_timer();
        let events = self.events.clone();
        let epoch = self.epoch;
        self.timer = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            for _ in 0..seconds {
                ticks.tick().await;
                if events.send((epoch, DriverEvent::Tick(generation))).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn schedule_advance(&mut self, index: usize) {
        self.cancel_pending_advance();
        let events = self.events.clone();
        let epoch = self.epoch;
        self.pending_advance = Some(tokio::spawn(async move {
            sleep(AUTO_ADVANCE_DELAY).await;
            let _ = events.send((epoch, DriverEvent::AutoAdvance(index)));
        }));
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(task) = self.pending_advance.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.cancel_timer();
        self.cancel_pending_advance();
    }
}

async fn run(
    mut driver: PlaybackDriver,
    mut commands: mpsc::UnboundedReceiver<PlaybackCommand>,
    mut events: mpsc::UnboundedReceiver<(u64, DriverEvent)>,
) {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => driver.handle(command),
                None => break,
            },
            Some((epoch, event)) = events.recv() => driver.on_event(epoch, event),
        }
    }
    log::debug!("playback driver for {:?} stopped", driver.source.title());
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Front end of a running playback driver. Dropping it stops the driver.
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<PlaybackCommand>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
    task: JoinHandle<()>,
}

impl PlaybackHandle {
    /// Queue a command for the driver.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Closed` if the driver task has stopped.
    pub fn send(&self, command: PlaybackCommand) -> Result<(), PlaybackError> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::Closed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that wakes on every new snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.clone()
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a driver for `quiz` on the current tokio runtime.
///
/// The player starts on its menu; send `PlaybackCommand::Start` to begin.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
#[must_use]
pub fn spawn_playback(quiz: Quiz, cues: Arc<dyn CueSink>) -> PlaybackHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (driver, snapshots) = PlaybackDriver::new(quiz, cues, event_tx);
    let task = tokio::spawn(run(driver, command_rx, event_rx));
    PlaybackHandle {
        commands: command_tx,
        snapshots,
        task,
    }
}
