//! Slash Trail Effects
//!
//! Slashes are spawned at full life and fade by a fixed amount every
//! rendered frame. A slash whose life reaches zero is dropped in the same
//! pass, so the list never holds a dead trail between frames.

use crate::core::clock::SimTime;
use crate::game::config::EffectsConfig;
use crate::game::events::GameEventData;
use crate::game::state::{Facing, GameState, SlashEffect};

/// Spawns and decays slash trails.
#[derive(Clone, Copy, Debug)]
pub struct EffectsManager {
    life_decay: f64,
}

impl EffectsManager {
    /// Create with the configured per-frame decay.
    pub fn new(config: &EffectsConfig) -> Self {
        Self { life_decay: config.life_decay }
    }

    /// Add a full-life slash.
    pub fn spawn(&self, state: &mut GameState, x: f64, y: f64, facing: Facing, now: SimTime) {
        state.slashes.push(SlashEffect { x, y, facing, life: 1.0 });
        state.push_event(now, GameEventData::SlashSpawned { x, y, facing });
    }

    /// Age every slash by one frame and drop the expired ones.
    /// Returns how many were removed.
    pub fn decay(&self, state: &mut GameState, now: SimTime) -> usize {
        let before = state.slashes.len();
        for slash in &mut state.slashes {
            slash.life = (slash.life - self.life_decay).max(0.0);
        }
        state.slashes.retain(|s| s.life > 0.0);

        let removed = before - state.slashes.len();
        if removed > 0 {
            state.push_event(now, GameEventData::SlashesExpired { count: removed });
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::ArenaConfig;

    fn setup() -> (EffectsManager, GameState) {
        let mut state = GameState::new(ArenaConfig::default());
        state.reset();
        (EffectsManager::new(&EffectsConfig::default()), state)
    }

    #[test]
    fn test_spawn_full_life() {
        let (effects, mut state) = setup();
        effects.spawn(&mut state, 130.0, 190.0, Facing::Right, SimTime::ZERO);
        assert_eq!(state.slashes.len(), 1);
        assert_eq!(state.slashes[0].life, 1.0);
    }

    #[test]
    fn test_life_strictly_decreases_until_removed() {
        let (effects, mut state) = setup();
        effects.spawn(&mut state, 0.0, 0.0, Facing::Right, SimTime::ZERO);

        let mut last = 1.0;
        let mut frames = 0;
        while let Some(slash) = state.slashes.first().copied() {
            assert!(slash.life > 0.0);
            assert!(slash.life <= last);
            last = slash.life;
            effects.decay(&mut state, SimTime::ZERO);
            if let Some(next) = state.slashes.first() {
                assert!(next.life < last);
            }
            frames += 1;
            assert!(frames <= 25, "slash outlived its decay");
        }

        // 1.0 / 0.05 = 20 frames, give or take one for rounding
        assert!((20..=21).contains(&frames));
    }

    #[test]
    fn test_independent_slashes() {
        let (effects, mut state) = setup();
        effects.spawn(&mut state, 0.0, 0.0, Facing::Right, SimTime::ZERO);
        for _ in 0..10 {
            effects.decay(&mut state, SimTime::ZERO);
        }
        effects.spawn(&mut state, 5.0, 0.0, Facing::Left, SimTime::ZERO);

        let mut removed = 0;
        for _ in 0..11 {
            removed += effects.decay(&mut state, SimTime::ZERO);
        }
        assert_eq!(removed, 1);
        assert_eq!(state.slashes.len(), 1);
        assert_eq!(state.slashes[0].facing, Facing::Left);
    }
}
