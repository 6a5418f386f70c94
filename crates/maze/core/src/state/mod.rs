//! Authoritative simulation state: grids, distances and the agent's pose.
mod agent;
mod common;
mod distance;
mod grid;

pub use agent::{AgentState, Phase, initial_known_grid};
pub use common::{Heading, Position};
pub use distance::{Distance, DistanceMap, flood_fill};
pub use grid::{Cell, Grid, GridDimensions, GridParseError};
