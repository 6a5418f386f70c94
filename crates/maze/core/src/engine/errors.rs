//! Error types for the agent control loop.

use crate::action::NavigationError;
use crate::error::{ErrorSeverity, SimError};
use crate::state::{Heading, Position};

/// Failure of a single phase. The agent state is left at the phase boundary
/// where the failure was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepError {
    #[error("no reachable move from {position} facing {heading}")]
    NoReachableMove { position: Position, heading: Heading },

    #[error("navigation failed at {position} facing {heading}: {source}")]
    Navigation {
        position: Position,
        heading: Heading,
        #[source]
        source: NavigationError,
    },
}

impl StepError {
    pub fn position(&self) -> Position {
        match self {
            Self::NoReachableMove { position, .. } | Self::Navigation { position, .. } => *position,
        }
    }
}

impl SimError for StepError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoReachableMove { .. } => "no_reachable_move",
            Self::Navigation { source, .. } => source.error_code(),
        }
    }
}
