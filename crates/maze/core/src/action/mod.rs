//! What the agent can do each step: look, enumerate moves, pick one.
mod movement;
mod navigation;
mod perception;

pub use movement::{AvailableMoves, Move, available_moves};
pub use navigation::{NavigationError, choose_heading};
pub use perception::{ObservationReport, Perception};
