//! Scene Lifecycle and Tick Driver
//!
//! `LifecycleController` owns the game state, the host sinks and the one
//! scheduler every piece of timed work runs through:
//!
//! ```text
//!   Menu ──start──► (fade) ──► Playing ──knockout / time up──► GameOver
//!    ▲                                                           │
//!    └────────────── (fade) ◄──restart── results shown ◄─(fade)──┘
//! ```
//!
//! Jobs due at the same instant run in rank order: lunge release, input,
//! idle sway, round clock, transition completion, frame. A knockout landed
//! by an input therefore beats a clock expiry due at the same instant.

use std::fmt;
use tracing::{debug, info, trace};

use crate::core::clock::SimTime;
use crate::core::hash::short_hex;
use crate::core::schedule::{Rank, Scheduler};
use crate::game::animator::EnemyAnimator;
use crate::game::combat::{AttackOutcome, CombatResolver};
use crate::game::config::GameConfig;
use crate::game::effects::EffectsManager;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputController, InputEvent, InputResponse, Key};
use crate::game::play_cue;
use crate::game::state::{GameState, Outcome, Scene};
use crate::game::timer::{TimerService, TimerTick};
use crate::host::render::{HeadlessRenderer, RenderSink, RenderSnapshot};
use crate::host::sound::{SoundBoard, SoundCue, SoundSink};
use crate::host::transition::{Fade, SceneTransition};

// =============================================================================
// COMMANDS / ERRORS
// =============================================================================

/// Menu-level command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Menu → Playing
    Start,
    /// GameOver → Menu
    Restart,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => f.write_str("start"),
            Command::Restart => f.write_str("restart"),
        }
    }
}

/// Lifecycle command errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Command not valid in the current scene.
    #[error("cannot {command} from scene {scene}")]
    InvalidScene {
        /// Rejected command
        command: Command,
        /// Scene at the time
        scene: Scene,
    },

    /// A scene fade is still running.
    #[error("scene transition in progress")]
    TransitionInProgress,
}

// =============================================================================
// JOBS
// =============================================================================

/// Scene swap performed when a fade completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Reset state and start the round
    EnterRound,
    /// Show the result and play its cue
    ShowResults(Outcome),
    /// Back to the title screen
    ReturnToMenu,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Job {
    AttackRelease { round: u32 },
    Input(InputEvent),
    IdleTick { round: u32 },
    TimerTick { round: u32 },
    TransitionDone(TransitionKind),
    Frame { round: u32 },
}

impl Rank for Job {
    fn rank(&self) -> u8 {
        match self {
            Job::AttackRelease { .. } => 0,
            Job::Input(_) => 1,
            Job::IdleTick { .. } => 2,
            Job::TimerTick { .. } => 3,
            Job::TransitionDone(_) => 4,
            Job::Frame { .. } => 5,
        }
    }
}

// =============================================================================
// RENDER LOOP
// =============================================================================

/// Whether the render loop keeps going after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    /// Schedule another frame
    Continue,
    /// GameOver observed; no further frames
    Stop,
}

/// The per-frame render/decay loop and its stop condition.
#[derive(Clone, Debug, Default)]
pub struct RenderLoop {
    running_round: Option<u32>,
    frames: u64,
}

impl RenderLoop {
    /// Create a stopped loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin rendering frames for `round`.
    pub fn start(&mut self, round: u32) {
        self.running_round = Some(round);
    }

    /// Whether frames are being produced.
    pub fn is_running(&self) -> bool {
        self.running_round.is_some()
    }

    /// Whether frames for `round` should still run.
    pub fn is_running_round(&self, round: u32) -> bool {
        self.running_round == Some(round)
    }

    /// Frames produced over the loop's lifetime.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame: draw a snapshot, age slashes, then stop if the round is
    /// over.
    pub fn frame(
        &mut self,
        state: &mut GameState,
        effects: &EffectsManager,
        renderer: &mut dyn RenderSink,
        now: SimTime,
    ) -> FrameStep {
        if !self.is_running() {
            return FrameStep::Stop;
        }

        renderer.render(&RenderSnapshot::capture(state));
        effects.decay(state, now);
        self.frames += 1;

        if state.scene == Scene::GameOver {
            self.running_round = None;
            trace!(at = %now, frames = self.frames, "render loop stopped");
            FrameStep::Stop
        } else {
            FrameStep::Continue
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Drives scenes, owns the state and runs every timed job.
pub struct LifecycleController<S, R, T> {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler<Job>,
    input: InputController,
    combat: CombatResolver,
    effects: EffectsManager,
    timer: TimerService,
    animator: EnemyAnimator,
    render_loop: RenderLoop,
    sound: S,
    renderer: R,
    transition: T,
    pending_transition: Option<TransitionKind>,
    now: SimTime,
}

impl<S, R, T> LifecycleController<S, R, T>
where
    S: SoundSink,
    R: RenderSink,
    T: SceneTransition,
{
    /// Create a controller sitting at the menu at time zero.
    pub fn new(config: GameConfig, sound: S, renderer: R, transition: T) -> Self {
        let effects = EffectsManager::new(&config.effects);
        Self {
            state: GameState::new(config.arena.clone()),
            scheduler: Scheduler::new(),
            input: InputController::new(config.combat.move_step),
            combat: CombatResolver::new(config.combat.clone(), effects),
            effects,
            timer: TimerService::new(config.round_timer_ms),
            animator: EnemyAnimator::new(&config.idle),
            render_loop: RenderLoop::new(),
            sound,
            renderer,
            transition,
            pending_transition: None,
            now: SimTime::ZERO,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Read-only game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current scene.
    pub fn scene(&self) -> Scene {
        self.state.scene
    }

    /// Result of the last finished round.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    /// Latest time processed.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Configuration in use.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fade currently running, if any.
    pub fn pending_transition(&self) -> Option<TransitionKind> {
        self.pending_transition
    }

    /// The render loop.
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Sound sink.
    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Render sink.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Transition primitive.
    pub fn transition(&self) -> &T {
        &self.transition
    }

    /// When the next queued job is due.
    pub fn next_due(&self) -> Option<SimTime> {
        self.scheduler.next_due()
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Leave the menu. The round begins once the fade completes.
    pub fn start(&mut self, now: SimTime) -> Result<(), LifecycleError> {
        self.advance_to(now);
        self.check_command(Command::Start, Scene::Menu)?;
        self.begin_transition(TransitionKind::EnterRound);
        Ok(())
    }

    /// Leave the results screen for the menu.
    pub fn restart(&mut self, now: SimTime) -> Result<(), LifecycleError> {
        self.advance_to(now);
        self.check_command(Command::Restart, Scene::GameOver)?;
        self.begin_transition(TransitionKind::ReturnToMenu);
        Ok(())
    }

    fn check_command(&self, command: Command, required: Scene) -> Result<(), LifecycleError> {
        if self.pending_transition.is_some() {
            return Err(LifecycleError::TransitionInProgress);
        }
        if self.state.scene != required {
            return Err(LifecycleError::InvalidScene { command, scene: self.state.scene });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Key pressed at `now`.
    pub fn key_down(&mut self, key: Key, now: SimTime) {
        self.submit(InputEvent::KeyDown(key), now);
    }

    /// Key released at `now`.
    pub fn key_up(&mut self, key: Key, now: SimTime) {
        self.submit(InputEvent::KeyUp(key), now);
    }

    /// Queue an input event and process everything due up to `now`.
    pub fn submit(&mut self, event: InputEvent, now: SimTime) {
        let at = now.max(self.now);
        self.scheduler.schedule(at, Job::Input(event));
        self.advance_to(at);
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Run every job due at or before `now`, in order.
    ///
    /// Time never moves backwards; an earlier `now` only processes what
    /// is already due.
    pub fn advance_to(&mut self, now: SimTime) {
        let now = now.max(self.now);
        while let Some((due, job)) = self.scheduler.pop_due(now) {
            self.now = due;
            self.run_job(job);
        }
        self.now = now;
    }

    /// Advance until the queue is empty or `deadline` is reached.
    /// Returns the time reached.
    pub fn run_until_idle(&mut self, deadline: SimTime) -> SimTime {
        while let Some(due) = self.scheduler.next_due() {
            if due > deadline {
                break;
            }
            self.advance_to(due);
        }
        self.now
    }

    fn run_job(&mut self, job: Job) {
        let now = self.now;
        match job {
            Job::Input(event) => self.on_input(event),
            Job::AttackRelease { round } => {
                self.combat.release_lunge(&mut self.state, round, now);
            }
            Job::IdleTick { round } => {
                if round == self.state.round && self.animator.tick(&mut self.state) {
                    self.scheduler.schedule(
                        now.after(self.animator.interval_ms()),
                        Job::IdleTick { round },
                    );
                }
            }
            Job::TimerTick { round } => {
                if round != self.state.round {
                    return;
                }
                match self.timer.tick(&mut self.state, now) {
                    TimerTick::Inactive => {}
                    TimerTick::Counting { .. } => {
                        self.scheduler.schedule(
                            now.after(self.timer.interval_ms()),
                            Job::TimerTick { round },
                        );
                    }
                    TimerTick::Expired(outcome) => self.on_round_ended(outcome),
                }
            }
            Job::TransitionDone(kind) => self.complete_transition(kind),
            Job::Frame { round } => {
                if !self.render_loop.is_running_round(round) {
                    return;
                }
                let step = self.render_loop.frame(
                    &mut self.state,
                    &self.effects,
                    &mut self.renderer,
                    now,
                );
                if step == FrameStep::Continue {
                    self.scheduler.schedule(
                        now.after(self.config.frame_interval_ms),
                        Job::Frame { round },
                    );
                }
            }
        }
    }

    fn on_input(&mut self, event: InputEvent) {
        let now = self.now;
        let response = self.input.handle(
            &mut self.state,
            &self.combat,
            &mut self.sound,
            event,
            now,
        );

        if let InputResponse::Attack(AttackOutcome::Resolved(report)) = response {
            self.scheduler.schedule(
                report.release_at,
                Job::AttackRelease { round: self.state.round },
            );
            if let Some(outcome) = report.knockout {
                self.on_round_ended(outcome);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scene transitions
    // -------------------------------------------------------------------------

    fn on_round_ended(&mut self, outcome: Outcome) {
        info!(
            round = self.state.round,
            at = %self.now,
            outcome = %outcome,
            player_hp = self.state.player.health.get(),
            enemy_hp = self.state.enemy.health.get(),
            "round over"
        );
        self.begin_transition(TransitionKind::ShowResults(outcome));
    }

    fn begin_transition(&mut self, kind: TransitionKind) {
        let done_at = self.transition.begin(self.now);
        self.pending_transition = Some(kind);
        self.scheduler.schedule(done_at, Job::TransitionDone(kind));
        debug!(?kind, at = %self.now, done_at = %done_at, "transition started");
    }

    fn complete_transition(&mut self, kind: TransitionKind) {
        let now = self.now;
        self.pending_transition = None;

        match kind {
            TransitionKind::EnterRound => {
                let from = self.state.scene;
                self.state.reset();
                let round = self.state.round;
                self.state.push_event(now, GameEventData::SceneChanged { from, to: Scene::Playing });
                self.state.push_event(now, GameEventData::RoundStarted);

                self.render_loop.start(round);
                self.scheduler.schedule(now, Job::Frame { round });
                self.scheduler.schedule(now.after(self.animator.interval_ms()), Job::IdleTick { round });
                self.scheduler.schedule(now.after(self.timer.interval_ms()), Job::TimerTick { round });

                info!(round, at = %now, hash = %short_hex(&self.state.compute_hash()), "round started");
            }
            TransitionKind::ShowResults(outcome) => {
                // Any announcement naming a winner gets the victory jingle.
                let cue = if outcome.text().contains("WINS") {
                    SoundCue::Win
                } else {
                    SoundCue::Lose
                };
                play_cue(&mut self.state, &mut self.sound, cue, now);
                info!(outcome = %outcome, "results shown");
            }
            TransitionKind::ReturnToMenu => {
                self.state.return_to_menu(now);
                info!(at = %now, "back at menu");
            }
        }

        self.transition.finish(now);
    }
}

/// Controller wired to the in-memory sinks.
pub type HeadlessController = LifecycleController<SoundBoard, HeadlessRenderer, Fade>;

impl HeadlessController {
    /// Controller that records sound, counts frames and fades without
    /// any real output.
    pub fn headless(config: GameConfig) -> Self {
        let sound = SoundBoard::new(&config.audio);
        let fade = Fade::new(config.transition_ms);
        LifecycleController::new(config, sound, HeadlessRenderer::new(), fade)
    }
}
