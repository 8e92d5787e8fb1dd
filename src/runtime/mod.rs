//! Runtime Module
//!
//! Non-deterministic drivers: the tokio wall-clock loop and the scripted
//! autopilot that feeds it (or a headless controller) with input.

pub mod driver;
pub mod autopilot;

pub use driver::{Driver, DriverSummary, HostCommand, WatchRenderer};
pub use autopilot::{simulate_round, Autopilot, SimulatedRound};
