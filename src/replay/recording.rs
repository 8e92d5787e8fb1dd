//! Round Recording
//!
//! Every command and key edge a host feeds the controller, with the time it
//! arrived. Replaying the entries into a fresh headless controller must
//! reproduce the same final state hash.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::debug;
use uuid::Uuid;

use crate::core::clock::SimTime;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::input::Key;
use crate::game::lifecycle::{HeadlessController, LifecycleController, LifecycleError};
use crate::game::state::Outcome;
use crate::host::render::RenderSink;
use crate::host::sound::SoundSink;
use crate::host::transition::SceneTransition;

/// Current recording format version.
pub const RECORDING_VERSION: u8 = 1;

/// Recording errors.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// bincode failed to encode or decode.
    #[error("recording codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Written by an incompatible version.
    #[error("recording version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Version this build reads
        expected: u8,
        /// Version found
        got: u8,
    },
}

/// One host action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// `start` command
    Start,
    /// `restart` command
    Restart,
    /// Key pressed
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
    /// Time advanced with no input
    Advance,
}

impl Action {
    /// Feed this action to a controller at `at`.
    pub fn apply<S, R, T>(
        self,
        controller: &mut LifecycleController<S, R, T>,
        at: SimTime,
    ) -> Result<(), LifecycleError>
    where
        S: SoundSink,
        R: RenderSink,
        T: SceneTransition,
    {
        match self {
            Action::Start => controller.start(at)?,
            Action::Restart => controller.restart(at)?,
            Action::KeyDown(key) => controller.key_down(key, at),
            Action::KeyUp(key) => controller.key_up(key, at),
            Action::Advance => controller.advance_to(at),
        }
        Ok(())
    }
}

/// An action and when it happened.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// Arrival time
    pub at: SimTime,
    /// What the host did
    pub action: Action,
}

/// Complete record of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recording {
    /// Format version.
    pub version: u8,

    /// Unique recording id.
    pub id: Uuid,

    /// Wall-clock time the recording was created.
    pub recorded_at: DateTime<Utc>,

    /// Configuration the session ran with.
    pub config: GameConfig,

    /// Actions in arrival order.
    pub entries: Vec<RecordedAction>,

    /// State hash at the end of the session.
    pub final_hash: Option<StateHash>,
}

/// Result of replaying a recording.
#[derive(Clone, Debug)]
pub struct ReplayResult {
    /// Final state hash
    pub state_hash: StateHash,
    /// Outcome of the last finished round
    pub outcome: Option<Outcome>,
    /// All events generated
    pub events: Vec<GameEvent>,
    /// Frames rendered
    pub frames: u64,
}

impl Recording {
    /// Start an empty recording.
    pub fn new(config: GameConfig) -> Self {
        Self {
            version: RECORDING_VERSION,
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            config,
            entries: Vec::new(),
            final_hash: None,
        }
    }

    /// Append an action.
    pub fn record(&mut self, at: SimTime, action: Action) {
        self.entries.push(RecordedAction { at, action });
    }

    /// Seal with the session's final state hash.
    pub fn finalize(&mut self, final_hash: StateHash) {
        self.final_hash = Some(final_hash);
    }

    /// Whether `finalize` has been called.
    pub fn is_complete(&self) -> bool {
        self.final_hash.is_some()
    }

    /// Time of the last entry.
    pub fn duration(&self) -> SimTime {
        self.entries.last().map_or(SimTime::ZERO, |e| e.at)
    }

    /// Hash of the action list alone, independent of id and timestamp.
    /// Two sessions fed identical input share a fingerprint.
    pub fn fingerprint(&self) -> Result<StateHash, ReplayError> {
        let mut hasher = StateHasher::for_recording();
        hasher.write(self.version).write(self.entries.len() as u64);
        hasher.write_bytes(&bincode::serialize(&self.config)?);
        hasher.write_bytes(&bincode::serialize(&self.entries)?);
        Ok(hasher.finalize())
    }

    /// Serialize with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize and check the version.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let recording: Recording = bincode::deserialize(data)?;
        if recording.version != RECORDING_VERSION {
            return Err(ReplayError::VersionMismatch {
                expected: RECORDING_VERSION,
                got: recording.version,
            });
        }
        Ok(recording)
    }

    /// Run every entry through a fresh headless controller.
    ///
    /// Commands rejected during recording are rejected again here, so they
    /// are skipped the same way.
    pub fn replay(&self) -> ReplayResult {
        let mut controller = HeadlessController::headless(self.config.clone());
        let mut events = Vec::new();

        for entry in &self.entries {
            if let Err(err) = entry.action.apply(&mut controller, entry.at) {
                debug!(at = %entry.at, action = ?entry.action, %err, "replayed command rejected");
            }
            events.extend(controller.take_events());
        }

        ReplayResult {
            state_hash: controller.state().compute_hash(),
            outcome: controller.outcome(),
            events,
            frames: controller.renderer().frames(),
        }
    }

    /// Replay and compare against the sealed hash. An unsealed recording
    /// never verifies.
    pub fn verify(&self) -> bool {
        match self.final_hash {
            Some(expected) => self.replay().state_hash == expected,
            None => false,
        }
    }
}
