use crate::action::AvailableMoves;
use crate::config::{AgentConfig, KnownGridInit};
use crate::env::Maze;

use super::{Cell, DistanceMap, Grid, Heading, Position, flood_fill};

/// Where the agent loop will resume on the next advance.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    AwaitObserve,
    AwaitDecide,
    AwaitMove,
    Done,
}

impl Phase {
    pub const fn is_done(self) -> bool {
        matches!(self, Phase::Done)
    }
}

/// Everything the agent believes and where it stands.
///
/// Valid and inspectable between any two phases; mutated only through
/// [`crate::engine::AgentEngine`] and the reset operations below.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub known: Grid,
    /// Distances from the most recent replanning.
    pub distances: DistanceMap,
    pub position: Position,
    pub heading: Heading,
    pub path: Vec<Position>,
    pub step_count: u64,
    pub phase: Phase,
    /// Moves found by the last observation, consumed by the decide phase.
    pub moves: AvailableMoves,
}

impl AgentState {
    pub fn new(maze: &Maze, config: &AgentConfig) -> Self {
        let known = initial_known_grid(maze, config.known_grid);
        let distances = flood_fill(&known, maze.goal());
        let mut state = Self {
            known,
            distances,
            position: maze.start(),
            heading: Heading::North,
            path: Vec::new(),
            step_count: 0,
            phase: Phase::AwaitObserve,
            moves: AvailableMoves::default(),
        };
        state.reset_robot(maze);
        state
    }

    /// Returns the agent to the start, keeping everything it has observed.
    pub fn reset_robot(&mut self, maze: &Maze) {
        self.position = maze.start();
        self.heading = Heading::North;
        self.path.clear();
        self.path.push(maze.start());
        self.step_count = 0;
        self.moves = AvailableMoves::default();
        self.phase = if maze.start() == maze.goal() {
            Phase::Done
        } else {
            Phase::AwaitObserve
        };
    }

    /// Forgets every observation and returns the agent to the start.
    pub fn reset_knowledge(&mut self, maze: &Maze, config: &AgentConfig) {
        self.known = initial_known_grid(maze, config.known_grid);
        self.distances = flood_fill(&self.known, maze.goal());
        self.reset_robot(maze);
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_done()
    }
}

/// Belief grid before any observation: everything assumed free.
pub fn initial_known_grid(maze: &Maze, init: KnownGridInit) -> Grid {
    match init {
        KnownGridInit::Full => Grid::with_dimensions(maze.grid().dimensions(), Cell::Free),
        KnownGridInit::Bounded => {
            let (start, goal) = (maze.start(), maze.goal());
            let height = start.row.max(goal.row) + 1;
            let width = start.col.max(goal.col) + 1;
            Grid::new(height as u32, width as u32, Cell::Free)
        }
    }
}
