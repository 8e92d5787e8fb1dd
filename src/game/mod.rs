//! Game Logic Module
//!
//! All duel simulation code. Deterministic given the same timed inputs.
//!
//! ## Module Structure
//!
//! - `config`: Tunable constants, JSON loading
//! - `state`: Game state aggregate, fighters, slash trails
//! - `input`: Key mapping and dispatch
//! - `combat`: Attack lunge, range check, damage, knockout
//! - `timer`: Round clock and time-up outcome
//! - `animator`: Enemy idle sway
//! - `effects`: Slash trail spawn and decay
//! - `lifecycle`: Scenes, transitions and the job scheduler
//! - `events`: Game events for logging and replay checks

pub mod config;
pub mod state;
pub mod events;
pub mod effects;
pub mod combat;
pub mod timer;
pub mod animator;
pub mod input;
pub mod lifecycle;

// Re-export key types
pub use config::{ConfigError, GameConfig};
pub use state::{EndCause, Facing, GameState, Health, Outcome, Scene, MAX_HEALTH};
pub use events::{GameEvent, GameEventData};
pub use combat::{AttackOutcome, AttackReport, CombatResolver, IgnoreReason};
pub use input::{InputController, InputEvent, InputResponse, Key};
pub use lifecycle::{Command, FrameStep, HeadlessController, LifecycleController, LifecycleError, RenderLoop, TransitionKind};

use crate::core::clock::SimTime;
use crate::host::sound::{SoundCue, SoundSink};

/// Play a cue and record it.
pub(crate) fn play_cue(state: &mut GameState, sound: &mut dyn SoundSink, cue: SoundCue, now: SimTime) {
    sound.play(cue, now);
    state.push_event(now, GameEventData::SoundCued { cue });
}

/// Play a cue unless it is already playing. Returns whether it started.
pub(crate) fn play_cue_exclusive(
    state: &mut GameState,
    sound: &mut dyn SoundSink,
    cue: SoundCue,
    now: SimTime,
) -> bool {
    let started = sound.play_exclusive(cue, now);
    if started {
        state.push_event(now, GameEventData::SoundCued { cue });
    }
    started
}
