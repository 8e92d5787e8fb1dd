//! Host Boundary
//!
//! Traits for everything the game hands off to its environment (audio,
//! drawing, scene fades) plus headless implementations of each.
//!
//! - `sound`: sound cues and the per-cue activity flag
//! - `render`: per-frame snapshots and the stick-figure layout
//! - `transition`: opaque fade between scenes

pub mod sound;
pub mod render;
pub mod transition;

pub use sound::{SoundBoard, SoundCue, SoundSink};
pub use render::{HeadlessRenderer, RenderSink, RenderSnapshot, SceneLayout};
pub use transition::{Fade, SceneTransition};
