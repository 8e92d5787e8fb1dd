//! Recording and Replay
//!
//! Captures the timed host actions of a session and re-runs them through
//! a headless controller to check that the final state hash matches.

pub mod recording;

pub use recording::{
    Action, RecordedAction, Recording, ReplayError, ReplayResult, RECORDING_VERSION,
};
