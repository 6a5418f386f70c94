//! Perceive → decide → move control loop.
//!
//! The [`AgentEngine`] is the only writer of [`AgentState`] during a run. Each
//! call to [`AgentEngine::advance`] executes one phase and returns, so a driver
//! can render or pace every micro-step; the next call resumes from
//! `state.phase`. Phases are atomic: an error leaves the state at the boundary
//! where it was detected.

mod errors;

pub use errors::StepError;

use tracing::debug;

use crate::action::{ObservationReport, Perception, available_moves, choose_heading};
use crate::env::Maze;
use crate::state::{AgentState, Cell, Heading, Phase, Position, flood_fill};

/// What a single [`AgentEngine::advance`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseOutcome {
    /// Perception ran. With `replanned` the distance map was recomputed and a
    /// decision follows; otherwise the only move was taken as the heading.
    Observed {
        report: ObservationReport,
        moves: usize,
        replanned: bool,
    },
    HeadingChosen { heading: Heading },
    Moved {
        position: Position,
        step: u64,
        reached_goal: bool,
    },
    /// The move target turned out to be a wall the agent never saw (only the
    /// cell behind it at the start can be unobserved). The wall is recorded and
    /// the agent observes again without moving.
    Bumped { into: Position },
    /// Already at the goal; nothing changed.
    Finished,
}

impl PhaseOutcome {
    /// True for the observation that only refreshed distances, ahead of a decision.
    pub const fn is_distance_update(&self) -> bool {
        matches!(
            self,
            PhaseOutcome::Observed {
                replanned: true,
                ..
            }
        )
    }

    pub const fn reached_goal(&self) -> bool {
        matches!(
            self,
            PhaseOutcome::Moved {
                reached_goal: true,
                ..
            }
        )
    }
}

/// Drives one agent through a maze.
pub struct AgentEngine<'a> {
    state: &'a mut AgentState,
    maze: &'a Maze,
    perception: Perception,
}

impl<'a> AgentEngine<'a> {
    pub fn new(state: &'a mut AgentState, maze: &'a Maze, perception: Perception) -> Self {
        Self {
            state,
            maze,
            perception,
        }
    }

    /// Executes the phase `state.phase` points at.
    pub fn advance(&mut self) -> Result<PhaseOutcome, StepError> {
        match self.state.phase {
            Phase::AwaitObserve => self.observe(),
            Phase::AwaitDecide => self.decide(),
            Phase::AwaitMove => Ok(self.apply_move()),
            Phase::Done => Ok(PhaseOutcome::Finished),
        }
    }

    /// Advances until the goal is reached or `max_phases` run out.
    /// Returns whether the goal was reached.
    pub fn run(&mut self, max_phases: usize) -> Result<bool, StepError> {
        for _ in 0..max_phases {
            if self.state.is_done() {
                break;
            }
            self.advance()?;
        }
        Ok(self.state.is_done())
    }

    fn observe(&mut self) -> Result<PhaseOutcome, StepError> {
        let truth = self.maze.grid().dimensions();
        let state = &mut *self.state;
        let mut report =
            self.perception
                .observe(self.maze.grid(), &mut state.known, state.position, state.heading);

        // Neighbours inside the true extent stay candidates even when the
        // belief has not grown to cover them yet.
        for heading in Heading::ALL {
            let neighbor = state.position.neighbor(heading);
            if truth.contains(neighbor) {
                report.grew |= state.known.grow_to_include(neighbor);
            }
        }

        let moves = available_moves(&state.known, state.position);
        if moves.is_empty() {
            return Err(StepError::NoReachableMove {
                position: state.position,
                heading: state.heading,
            });
        }

        let count = moves.len();
        let replanned = match moves.only() {
            Some(single) => {
                state.heading = single.heading;
                state.phase = Phase::AwaitMove;
                false
            }
            None => {
                state.distances = flood_fill(&state.known, self.maze.goal());
                // A goal sealed off inside the belief may still be reachable
                // through territory the belief does not cover yet.
                while !state.distances.get(state.position).is_reachable()
                    && state.known.widen_toward(truth)
                {
                    report.grew = true;
                    state.distances = flood_fill(&state.known, self.maze.goal());
                }
                state.phase = Phase::AwaitDecide;
                true
            }
        };
        state.moves = moves;

        debug!(
            target: "maze_core::engine",
            position = %state.position,
            heading = %state.heading,
            observed = report.cells_observed,
            walls = report.walls_revealed,
            moves = count,
            replanned,
            "observed"
        );

        Ok(PhaseOutcome::Observed {
            report,
            moves: count,
            replanned,
        })
    }

    fn decide(&mut self) -> Result<PhaseOutcome, StepError> {
        let state = &mut *self.state;
        let heading = choose_heading(&state.moves, state.heading, &state.distances).map_err(
            |source| StepError::Navigation {
                position: state.position,
                heading: state.heading,
                source,
            },
        )?;

        state.heading = heading;
        state.phase = Phase::AwaitMove;

        debug!(
            target: "maze_core::engine",
            position = %state.position,
            %heading,
            "heading chosen"
        );

        Ok(PhaseOutcome::HeadingChosen { heading })
    }

    fn apply_move(&mut self) -> PhaseOutcome {
        let state = &mut *self.state;
        let target = state.position.neighbor(state.heading);

        if !self.maze.grid().is_free(target) {
            state.known.grow_to_include(target);
            state.known.set(target, Cell::Wall);
            state.phase = Phase::AwaitObserve;
            debug!(target: "maze_core::engine", into = %target, "bumped into unseen wall");
            return PhaseOutcome::Bumped { into: target };
        }

        state.position = target;
        state.path.push(target);
        state.step_count += 1;

        let reached_goal = target == self.maze.goal();
        state.phase = if reached_goal {
            Phase::Done
        } else {
            Phase::AwaitObserve
        };

        debug!(
            target: "maze_core::engine",
            position = %target,
            step = state.step_count,
            reached_goal,
            "moved"
        );

        PhaseOutcome::Moved {
            position: target,
            step: state.step_count,
            reached_goal,
        }
    }
}
