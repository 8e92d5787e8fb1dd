//! Scene Transitions
//!
//! The fade between scenes is opaque to the game. `begin` starts it and
//! says when its completion callback is due; the lifecycle controller
//! queues that callback as a job instead of holding a closure.

use tracing::trace;

use crate::core::clock::SimTime;

/// Visual effect played when entering or leaving a round.
pub trait SceneTransition {
    /// Start covering the screen. Returns when the cover is complete and
    /// the scene swap should run.
    fn begin(&mut self, now: SimTime) -> SimTime;

    /// Uncover the screen after the swap.
    fn finish(&mut self, now: SimTime);
}

/// Fixed-length fade to black and back.
#[derive(Clone, Debug)]
pub struct Fade {
    duration_ms: u64,
    started: u32,
    finished: u32,
}

impl Fade {
    /// Create a fade lasting `duration_ms` each way.
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started: 0,
            finished: 0,
        }
    }

    /// Fades started so far.
    pub fn started(&self) -> u32 {
        self.started
    }

    /// Fades finished so far.
    pub fn finished(&self) -> u32 {
        self.finished
    }
}

impl SceneTransition for Fade {
    fn begin(&mut self, now: SimTime) -> SimTime {
        self.started += 1;
        trace!(at = %now, "fade in");
        now.after(self.duration_ms)
    }

    fn finish(&mut self, now: SimTime) {
        self.finished += 1;
        trace!(at = %now, "fade out");
    }
}
