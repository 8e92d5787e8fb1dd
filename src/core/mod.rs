//! Core deterministic primitives.
//!
//! Time, scheduling and hashing. Nothing here reads the wall clock or
//! depends on host state, so a recorded session replays bit-for-bit.

pub mod clock;
pub mod schedule;
pub mod hash;

// Re-export core types
pub use clock::SimTime;
pub use schedule::{Rank, Scheduler};
pub use hash::{HashField, StateHash, StateHasher, compute_state_hash};
