//! Deterministic maze generation and an exploring agent.
//!
//! `maze-core` owns the algorithmic part of the simulation: the origin-shift
//! perfect-maze generator ([`env`]), the agent's belief grid and distance
//! field ([`state`]), its sensing and navigation policy ([`action`]) and the
//! perceive → decide → move loop in [`engine::AgentEngine`]. Everything here is
//! synchronous and free of I/O; pacing, control and presentation live in the
//! `runtime` crate.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    AvailableMoves, Move, NavigationError, ObservationReport, Perception, available_moves,
    choose_heading,
};
pub use config::{AgentConfig, KnownGridInit, MazeConfig, Seed, SeedParseError, normalize_dimension};
pub use engine::{AgentEngine, PhaseOutcome, StepError};
pub use env::{GenerateError, Maze, MazeGenerator, PcgRng, RngSource, generate};
pub use error::{ErrorSeverity, SimError};
pub use state::{
    AgentState, Cell, Distance, DistanceMap, Grid, GridDimensions, GridParseError, Heading, Phase,
    Position, flood_fill, initial_known_grid,
};
