//! Game Events
//!
//! Events generated during simulation for logging, tests and replay checks.

use serde::{Serialize, Deserialize};

use crate::core::clock::SimTime;
use crate::game::state::{EndCause, Facing, Outcome, Scene};
use crate::host::sound::SoundCue;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A fresh round began
    RoundStarted,

    /// Player stepped
    PlayerMoved {
        x: f64,
        facing: Facing,
    },

    /// An attack attempt passed the cooldown check
    AttackResolved {
        origin_x: f64,
        lunge_x: f64,
        hit: bool,
        damage: u32,
        enemy_health: u32,
    },

    /// Lunge ended, player snapped back
    AttackReleased {
        x: f64,
    },

    /// Slash trail created
    SlashSpawned {
        x: f64,
        y: f64,
        facing: Facing,
    },

    /// Slash trails faded out this frame
    SlashesExpired {
        count: usize,
    },

    /// Round clock ticked down
    TimerTicked {
        remaining: u32,
    },

    /// Round finished
    RoundEnded {
        outcome: Outcome,
        cause: EndCause,
    },

    /// Scene flag changed
    SceneChanged {
        from: Scene,
        to: Scene,
    },

    /// A sound cue was sent to the sound sink
    SoundCued {
        cue: SoundCue,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// When the event occurred
    pub at: SimTime,

    /// Round the event belongs to
    pub round: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at: SimTime, round: u32, data: GameEventData) -> Self {
        Self { at, round, data }
    }

    /// Whether this is a resolved (not ignored) attack.
    pub fn is_attack(&self) -> bool {
        matches!(self.data, GameEventData::AttackResolved { .. })
    }

    /// The outcome, if this event ended a round.
    pub fn round_outcome(&self) -> Option<Outcome> {
        match self.data {
            GameEventData::RoundEnded { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}
