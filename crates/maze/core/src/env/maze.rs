use crate::error::{ErrorSeverity, SimError};
use crate::state::{Grid, Position, flood_fill};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerateError {
    #[error("maze dimensions {height}x{width} must be odd and at least 3")]
    InvalidDimensions { height: u32, width: u32 },

    #[error("endpoint {position} is not a free cell of the maze")]
    InvalidEndpoint { position: Position },
}

impl SimError for GenerateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "invalid_dimensions",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
        }
    }
}

/// Ground-truth maze: the layout plus the endpoints and seed that identify it.
///
/// Immutable once built; a new maze is a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maze {
    grid: Grid,
    start: Position,
    goal: Position,
    seed: u64,
}

impl Maze {
    /// Wraps a hand-built layout. Both endpoints must be free cells.
    pub fn from_parts(
        grid: Grid,
        start: Position,
        goal: Position,
        seed: u64,
    ) -> Result<Self, GenerateError> {
        for position in [start, goal] {
            if !grid.is_free(position) {
                return Err(GenerateError::InvalidEndpoint { position });
            }
        }
        Ok(Self {
            grid,
            start,
            goal,
            seed,
        })
    }

    pub(crate) fn new_unchecked(grid: Grid, start: Position, goal: Position, seed: u64) -> Self {
        Self {
            grid,
            start,
            goal,
            seed,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Optimal start-to-goal path length over the true layout.
    pub fn ideal_step_count(&self) -> Option<u32> {
        flood_fill(&self.grid, self.goal).get(self.start).steps()
    }
}
