//! Payloads carried by [`super::Event`].

use serde::{Deserialize, Serialize};

use maze_core::{Phase, PhaseOutcome, Position};

/// One executed phase together with where it left the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub outcome: PhaseOutcome,
    /// Phase the agent is in after the outcome.
    pub phase: Phase,
    pub position: Position,
    pub step_count: u64,
}

/// What a reset discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetScope {
    /// Position, heading, path and step counter only.
    Robot,
    /// Also every observed wall.
    Knowledge,
    /// A new true maze replaced the old one.
    Maze,
}
