//! Round Clock
//!
//! Counts the round down one second per tick. At zero the healthier
//! fighter wins; a tie goes to the player.

use crate::core::clock::SimTime;
use crate::game::events::GameEventData;
use crate::game::state::{EndCause, GameState, Outcome};

/// Result of one clock tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTick {
    /// Not playing; nothing changed
    Inactive,
    /// Clock decremented, round continues
    Counting {
        /// Seconds left
        remaining: u32,
    },
    /// Clock hit zero and ended the round
    Expired(Outcome),
}

/// Advances the round clock.
#[derive(Clone, Copy, Debug)]
pub struct TimerService {
    interval_ms: u64,
}

impl TimerService {
    /// Create a clock ticking every `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }

    /// Real time between ticks.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Decrement the clock once.
    pub fn tick(&self, state: &mut GameState, now: SimTime) -> TimerTick {
        if !state.is_playing() {
            return TimerTick::Inactive;
        }

        state.timer = state.timer.saturating_sub(1);
        state.push_event(now, GameEventData::TimerTicked { remaining: state.timer });

        if state.timer > 0 {
            return TimerTick::Counting { remaining: state.timer };
        }

        let outcome = Outcome::on_time_up(state.player.health, state.enemy.health);
        state.end_round(outcome, EndCause::TimeUp, now);
        TimerTick::Expired(outcome)
    }
}
