//! End-of-run report in text or JSON form.

use std::fmt;

use serde::Serialize;

use maze_core::{SimError, StepError};
use runtime::RenderData;

/// Why the run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    GoalReached,
    StepFailed { code: &'static str, message: String },
    TimedOut,
    Interrupted,
}

impl RunOutcome {
    pub fn step_failed(error: &StepError) -> Self {
        Self::StepFailed {
            code: error.error_code(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::GoalReached)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoalReached => f.write_str("goal reached"),
            Self::StepFailed { code, message } => write!(f, "step failed [{code}]: {message}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Interrupted => f.write_str("interrupted"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub render: RenderData,
}

impl RunReport {
    pub fn new(outcome: RunOutcome, render: RenderData) -> Self {
        Self { outcome, render }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = &self.render;
        let dimensions = render.true_grid.dimensions();
        writeln!(f, "seed:        {}", render.seed)?;
        writeln!(f, "dimensions:  {}x{}", dimensions.height, dimensions.width)?;
        writeln!(f, "start:       {}", render.start)?;
        writeln!(f, "goal:        {}", render.goal)?;
        writeln!(f, "outcome:     {}", self.outcome)?;
        writeln!(f, "steps taken: {}", render.step_count)?;
        match render.ideal_step_count {
            Some(ideal) => writeln!(f, "ideal steps: {ideal}")?,
            None => writeln!(f, "ideal steps: unreachable")?,
        }
        writeln!(f)?;
        write!(f, "{}", render.known_grid)
    }
}
