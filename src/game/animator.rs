//! Enemy Idle Sway
//!
//! Purely cosmetic back-and-forth drift of the enemy while a round runs.

use crate::game::config::IdleConfig;
use crate::game::state::GameState;

/// Steps the enemy's idle offset.
#[derive(Clone, Copy, Debug)]
pub struct EnemyAnimator {
    interval_ms: u64,
    step: f64,
    bound: f64,
}

impl EnemyAnimator {
    /// Create from config.
    pub fn new(config: &IdleConfig) -> Self {
        Self {
            interval_ms: config.interval_ms,
            step: config.step,
            bound: config.bound,
        }
    }

    /// Real time between steps.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Move the sway one step; reverse once it passes the bound.
    /// Returns false (and does nothing) outside a round.
    pub fn tick(&self, state: &mut GameState) -> bool {
        if !state.is_playing() {
            return false;
        }
        let enemy = &mut state.enemy;
        enemy.idle_offset += self.step * enemy.idle_dir.sign();
        if enemy.idle_offset.abs() > self.bound {
            enemy.idle_dir = enemy.idle_dir.flipped();
        }
        true
    }
}
