//! Real-Time Driver
//!
//! Runs a `LifecycleController` against the wall clock. Host commands
//! arrive over an mpsc channel; a frame-rate interval maps elapsed real
//! time onto `SimTime` and advances the controller. This is the only
//! non-deterministic part of the crate: which instant a command lands on
//! depends on when it arrives, so commands are recorded with that instant.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::clock::SimTime;
use crate::core::hash::{short_hex, StateHash};
use crate::game::input::Key;
use crate::game::lifecycle::LifecycleController;
use crate::game::state::{Outcome, Scene};
use crate::host::render::{RenderSink, RenderSnapshot};
use crate::host::sound::SoundSink;
use crate::host::transition::SceneTransition;
use crate::replay::recording::{Action, Recording};

/// Message from the host to the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// Start a round from the menu
    Start,
    /// Return to the menu from the results screen
    Restart,
    /// Key pressed
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
    /// Stop the driver
    Shutdown,
}

impl HostCommand {
    /// The recordable action, if any.
    pub fn action(self) -> Option<Action> {
        match self {
            HostCommand::Start => Some(Action::Start),
            HostCommand::Restart => Some(Action::Restart),
            HostCommand::KeyDown(key) => Some(Action::KeyDown(key)),
            HostCommand::KeyUp(key) => Some(Action::KeyUp(key)),
            HostCommand::Shutdown => None,
        }
    }
}

/// Render sink that publishes every frame on a watch channel.
pub struct WatchRenderer {
    tx: watch::Sender<RenderSnapshot>,
}

impl WatchRenderer {
    /// Create the sink and a receiver seeded with `initial`.
    pub fn channel(initial: RenderSnapshot) -> (Self, watch::Receiver<RenderSnapshot>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }
}

impl RenderSink for WatchRenderer {
    fn render(&mut self, frame: &RenderSnapshot) {
        // No receivers left is fine; frames are fire-and-forget.
        let _ = self.tx.send(frame.clone());
    }
}

/// What a driver run did.
#[derive(Clone, Debug)]
pub struct DriverSummary {
    /// Simulated time reached
    pub elapsed: SimTime,
    /// Scene at shutdown
    pub scene: Scene,
    /// Last round outcome
    pub outcome: Option<Outcome>,
    /// Final state hash
    pub state_hash: StateHash,
    /// Commands received (excluding shutdown)
    pub commands: usize,
    /// Commands the controller rejected
    pub rejected: usize,
    /// Game events drained from the controller
    pub events: usize,
    /// Sealed recording, if recording was enabled
    pub recording: Option<Recording>,
}

/// Wall-clock driver around a controller.
pub struct Driver<S, R, T> {
    controller: LifecycleController<S, R, T>,
    commands: mpsc::Receiver<HostCommand>,
    recording: Option<Recording>,
}

impl<S, R, T> Driver<S, R, T>
where
    S: SoundSink,
    R: RenderSink,
    T: SceneTransition,
{
    /// Wrap a fresh controller.
    pub fn new(controller: LifecycleController<S, R, T>, commands: mpsc::Receiver<HostCommand>) -> Self {
        Self {
            controller,
            commands,
            recording: None,
        }
    }

    /// Record every command for later replay.
    pub fn with_recording(mut self) -> Self {
        self.recording = Some(Recording::new(self.controller.config().clone()));
        self
    }

    /// Log and discard queued game events, returning how many there were.
    fn drain_events(&mut self) -> usize {
        let events = self.controller.take_events();
        for event in &events {
            debug!(at = %event.at, round = event.round, data = ?event.data, "game event");
        }
        events.len()
    }

    /// Run until `Shutdown` arrives or every sender is dropped.
    pub async fn run(mut self) -> DriverSummary {
        let started = Instant::now();
        let sim_now = || SimTime::from_millis(started.elapsed().as_millis() as u64);

        let frame = Duration::from_millis(self.controller.config().frame_interval_ms);
        let mut ticker = interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut commands = 0;
        let mut rejected = 0;
        let mut events = 0;

        info!(frame_ms = frame.as_millis() as u64, "driver running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.controller.advance_to(sim_now());
                    events += self.drain_events();
                }
                command = self.commands.recv() => {
                    let Some(action) = command.and_then(HostCommand::action) else {
                        break;
                    };
                    let now = sim_now();
                    commands += 1;
                    if let Some(recording) = self.recording.as_mut() {
                        recording.record(now, action);
                    }
                    if let Err(err) = action.apply(&mut self.controller, now) {
                        rejected += 1;
                        debug!(at = %now, ?action, %err, "command rejected");
                    }
                    events += self.drain_events();
                }
            }
        }

        let elapsed = sim_now().max(self.controller.now());
        self.controller.advance_to(elapsed);
        events += self.drain_events();
        let state_hash = self.controller.state().compute_hash();
        if let Some(recording) = self.recording.as_mut() {
            recording.record(elapsed, Action::Advance);
            recording.finalize(state_hash);
        }

        info!(
            at = %elapsed,
            scene = %self.controller.scene(),
            commands,
            rejected,
            events,
            hash = %short_hex(&state_hash),
            "driver stopped"
        );

        DriverSummary {
            elapsed,
            scene: self.controller.scene(),
            outcome: self.controller.outcome(),
            state_hash,
            commands,
            rejected,
            events,
            recording: self.recording,
        }
    }
}
