//! Game Configuration
//!
//! Every tunable constant of the duel lives here. `Default` reproduces the
//! classic browser game; JSON files may override any subset of fields.

use std::path::Path;
use serde::{Serialize, Deserialize};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `GameConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Spawn layout and round length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Player spawn position.
    pub player_start: (f64, f64),
    /// Enemy spawn position.
    pub enemy_start: (f64, f64),
    /// Round length in seconds.
    pub round_seconds: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player_start: (100.0, 200.0),
            enemy_start: (350.0, 200.0),
            round_seconds: 60,
        }
    }
}

/// Movement and melee attack tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Distance moved per move key press.
    pub move_step: f64,
    /// Forward displacement during an attack.
    pub lunge_distance: f64,
    /// Hits land when the fighters are strictly closer than this.
    pub melee_range: f64,
    /// Health removed by a landed hit.
    pub damage: u32,
    /// Lunge duration; no new attack may begin before it elapses.
    pub cooldown_ms: u64,
    /// Slash spawn offset: forward along facing, and upward.
    pub slash_offset: (f64, f64),
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            move_step: 5.0,
            lunge_distance: 10.0,
            melee_range: 40.0,
            damage: 10,
            cooldown_ms: 200,
            slash_offset: (20.0, 10.0),
        }
    }
}

/// Enemy idle sway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Time between sway steps.
    pub interval_ms: u64,
    /// Offset change per step.
    pub step: f64,
    /// Direction flips once |offset| exceeds this.
    pub bound: f64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            step: 0.05,
            bound: 2.0,
        }
    }
}

/// Slash trail decay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Life removed from every slash per rendered frame.
    pub life_decay: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { life_decay: 0.05 }
    }
}

/// How long each sound cue counts as playing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Footstep
    pub step_ms: u64,
    /// Sword hit
    pub hit_ms: u64,
    /// Victory jingle
    pub win_ms: u64,
    /// Defeat jingle
    pub lose_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            step_ms: 300,
            hit_ms: 250,
            win_ms: 1500,
            lose_ms: 1500,
        }
    }
}

/// Complete configuration for a duel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Spawn layout and round length
    pub arena: ArenaConfig,
    /// Movement and attack tuning
    pub combat: CombatConfig,
    /// Round clock cadence (one second per decrement)
    pub round_timer_ms: u64,
    /// Enemy idle animation
    pub idle: IdleConfig,
    /// Slash trail decay
    pub effects: EffectsConfig,
    /// Render loop cadence
    pub frame_interval_ms: u64,
    /// Duration of a scene fade
    pub transition_ms: u64,
    /// Sound cue durations
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            combat: CombatConfig::default(),
            round_timer_ms: 1000,
            idle: IdleConfig::default(),
            effects: EffectsConfig::default(),
            frame_interval_ms: 16,
            transition_ms: 1000,
            audio: AudioConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("round_timer_ms", self.round_timer_ms),
            ("idle.interval_ms", self.idle.interval_ms),
            ("frame_interval_ms", self.frame_interval_ms),
            ("combat.cooldown_ms", self.combat.cooldown_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be > 0")));
            }
        }

        if self.arena.round_seconds == 0 {
            return Err(ConfigError::Invalid("arena.round_seconds must be > 0".into()));
        }
        if !(self.effects.life_decay > 0.0 && self.effects.life_decay <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "effects.life_decay must be in (0, 1], got {}",
                self.effects.life_decay
            )));
        }
        if !(self.combat.melee_range > 0.0) {
            return Err(ConfigError::Invalid("combat.melee_range must be > 0".into()));
        }
        if self.combat.damage == 0 {
            return Err(ConfigError::Invalid("combat.damage must be > 0".into()));
        }
        if !(self.idle.bound > 0.0) {
            return Err(ConfigError::Invalid("idle.bound must be > 0".into()));
        }

        Ok(())
    }
}
