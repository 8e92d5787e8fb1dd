//! # Slash Duel
//!
//! Deterministic state machine for a two-fighter real-time slash duel:
//! a player walks and lunges at an idle enemy until one side is knocked
//! out or the round clock runs down.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SLASH DUEL                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── clock.rs    - Millisecond simulation time               │
//! │  ├── schedule.rs - Ordered job queue                         │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── state.rs    - Fighters, slashes, scene, clock           │
//! │  ├── input.rs    - Key mapping and dispatch                  │
//! │  ├── combat.rs   - Lunge, range check, damage                │
//! │  ├── timer.rs    - Round clock                               │
//! │  ├── animator.rs - Enemy idle sway                           │
//! │  ├── effects.rs  - Slash trails                              │
//! │  └── lifecycle.rs- Scenes, fades, job dispatch               │
//! │                                                              │
//! │  host/           - External boundary                         │
//! │  ├── sound.rs    - Sound cues                                │
//! │  ├── render.rs   - Frame snapshots and layout                │
//! │  └── transition.rs - Scene fades                             │
//! │                                                              │
//! │  replay/         - Recording and hash verification           │
//! │  runtime/        - tokio wall-clock driver, autopilot        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `game/` and `host/` modules never read the wall clock.
//! Every timed effect is a job in one scheduler, ordered by due time and
//! then by a fixed rank per job kind. Feeding the same timed actions into
//! a fresh controller yields the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod host;
pub mod replay;
pub mod runtime;

// Re-export commonly used types
pub use core::clock::SimTime;
pub use core::hash::StateHash;
pub use game::config::GameConfig;
pub use game::input::Key;
pub use game::lifecycle::{HeadlessController, LifecycleController, LifecycleError};
pub use game::state::{GameState, Outcome, Scene};
pub use replay::recording::Recording;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
