//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the only owner of the [`crate::Simulation`]; all
//! access goes through its command channel.

mod simulation;

pub use simulation::{Command, SimulationWorker};
