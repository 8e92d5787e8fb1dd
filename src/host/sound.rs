//! Sound Cues
//!
//! Audio is fire-and-forget from the game's point of view: components name
//! a cue and the sink plays it. The sink also owns the per-cue "still
//! playing" flag, which the footstep debounce reads.

use std::collections::VecDeque;
use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::clock::SimTime;
use crate::game::config::AudioConfig;

/// Identifier of a sound effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SoundCue {
    /// Footstep while moving
    Step = 0,
    /// Sword swing
    Hit = 1,
    /// Victory
    Win = 2,
    /// Defeat
    Lose = 3,
}

impl SoundCue {
    /// All cues, indexed by discriminant.
    pub const ALL: [SoundCue; 4] = [SoundCue::Step, SoundCue::Hit, SoundCue::Win, SoundCue::Lose];

    /// Playback volume in [0, 1].
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Step => 0.4,
            SoundCue::Hit => 0.6,
            SoundCue::Win | SoundCue::Lose => 1.0,
        }
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Step => "step",
            SoundCue::Hit => "hit",
            SoundCue::Win => "win",
            SoundCue::Lose => "lose",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver of sound cues.
pub trait SoundSink {
    /// Start playing `cue` (restarting it if already playing).
    fn play(&mut self, cue: SoundCue, now: SimTime);

    /// Whether `cue` is still audible at `now`.
    fn is_active(&self, cue: SoundCue, now: SimTime) -> bool;

    /// Play `cue` only if it is not already playing. Returns whether it
    /// was started.
    fn play_exclusive(&mut self, cue: SoundCue, now: SimTime) -> bool {
        if self.is_active(cue, now) {
            return false;
        }
        self.play(cue, now);
        true
    }
}

/// Cues kept in the recent-history window.
pub const RECENT_CUES: usize = 32;

/// Sound sink that tracks cue lifetimes without producing audio.
///
/// Used headless, in tests, and as the bookkeeping half of a real
/// audio backend. Memory stays constant however long a session runs:
/// per-cue totals plus the last `RECENT_CUES` plays.
#[derive(Clone, Debug)]
pub struct SoundBoard {
    durations: [u64; 4],
    active_until: [Option<SimTime>; 4],
    counts: [usize; 4],
    recent: VecDeque<(SimTime, SoundCue)>,
}

impl SoundBoard {
    /// Create a board with the configured cue durations.
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            durations: [config.step_ms, config.hit_ms, config.win_ms, config.lose_ms],
            active_until: [None; 4],
            counts: [0; 4],
            recent: VecDeque::with_capacity(RECENT_CUES),
        }
    }

    /// The most recent cues, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &(SimTime, SoundCue)> + '_ {
        self.recent.iter()
    }

    /// Number of times `cue` was played.
    pub fn count(&self, cue: SoundCue) -> usize {
        self.counts[cue as usize]
    }

    /// Number of cues played in total.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl SoundSink for SoundBoard {
    fn play(&mut self, cue: SoundCue, now: SimTime) {
        let idx = cue as usize;
        self.active_until[idx] = Some(now.after(self.durations[idx]));
        self.counts[idx] += 1;
        if self.recent.len() == RECENT_CUES {
            self.recent.pop_front();
        }
        self.recent.push_back((now, cue));
        debug!(cue = %cue, volume = cue.volume(), at = %now, "sound cue");
    }

    fn is_active(&self, cue: SoundCue, now: SimTime) -> bool {
        self.active_until[cue as usize].is_some_and(|until| now < until)
    }
}
