//! Scripted Player
//!
//! Walks toward the enemy until it is in reach, then swings whenever the
//! previous lunge has ended. Decisions only look at a `RenderSnapshot`,
//! so the same pilot can drive the headless controller or the real-time
//! driver through its snapshot feed.

use tracing::info;

use crate::core::clock::SimTime;
use crate::core::hash::short_hex;
use crate::game::config::GameConfig;
use crate::game::input::Key;
use crate::game::lifecycle::HeadlessController;
use crate::game::state::Scene;
use crate::host::render::RenderSnapshot;
use crate::replay::recording::{Action, Recording};

/// Scripted input source.
#[derive(Clone, Debug)]
pub struct Autopilot {
    reach: f64,
    step_every_ms: u64,
    next_at: SimTime,
}

impl Autopilot {
    /// Pilot that closes to strictly inside `reach` before swinging and
    /// presses at most one key every `step_every_ms`.
    pub fn new(reach: f64, step_every_ms: u64) -> Self {
        Self {
            reach,
            step_every_ms,
            next_at: SimTime::ZERO,
        }
    }

    /// Pilot tuned to a config: reach is the melee range, key presses at
    /// roughly keyboard auto-repeat rate.
    pub fn for_config(config: &GameConfig) -> Self {
        Self::new(config.combat.melee_range, 30)
    }

    /// Next key to press, if any.
    pub fn next_action(&mut self, frame: &RenderSnapshot, now: SimTime) -> Option<Action> {
        if frame.scene != Scene::Playing || now < self.next_at || frame.player.attacking {
            return None;
        }

        let gap = frame.enemy.x - frame.player.x;
        let key = if gap.abs() >= self.reach {
            if gap > 0.0 { Key::MoveRight } else { Key::MoveLeft }
        } else {
            Key::Attack
        };

        self.next_at = now.after(self.step_every_ms);
        Some(Action::KeyDown(key))
    }
}

/// Result of a simulated round.
pub struct SimulatedRound {
    /// Controller after the results screen appeared
    pub controller: HeadlessController,
    /// Every action fed in, sealed with the final hash
    pub recording: Recording,
}

/// Play one autopilot round on simulated time, polling every frame, until
/// the results are shown or `deadline` passes.
pub fn simulate_round(config: GameConfig, deadline: SimTime) -> SimulatedRound {
    let poll_ms = config.frame_interval_ms;
    let mut pilot = Autopilot::for_config(&config);
    let mut recording = Recording::new(config.clone());
    let mut controller = HeadlessController::headless(config);

    let mut now = SimTime::ZERO;
    recording.record(now, Action::Start);
    // Fresh controller sits at the menu, so start cannot be rejected.
    let _ = Action::Start.apply(&mut controller, now);

    while now < deadline {
        now = now.after(poll_ms);
        controller.advance_to(now);

        let results_shown = controller.scene() == Scene::GameOver
            && controller.pending_transition().is_none();
        if results_shown {
            break;
        }

        let frame = RenderSnapshot::capture(controller.state());
        if let Some(action) = pilot.next_action(&frame, now) {
            recording.record(now, action);
            let _ = action.apply(&mut controller, now);
        }
    }

    recording.record(now, Action::Advance);
    let hash = controller.state().compute_hash();
    recording.finalize(hash);

    info!(
        at = %now,
        outcome = ?controller.outcome(),
        actions = recording.entries.len(),
        hash = %short_hex(&hash),
        "simulated round finished"
    );

    SimulatedRound { controller, recording }
}
