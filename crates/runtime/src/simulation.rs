//! Single-owner controller around one maze and one agent.
//!
//! [`Simulation`] is the control surface a driver talks to: it starts and
//! pauses the run, advances the agent phase by phase, resets the robot or its
//! knowledge, regenerates the maze and hands out [`RenderData`] snapshots.
//! It is plain synchronous state; the worker in this crate is what gives it a
//! clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use maze_core::{
    AgentConfig, AgentEngine, AgentState, DistanceMap, GenerateError, Grid, Heading, Maze,
    MazeConfig, MazeGenerator, Perception, Phase, PhaseOutcome, Position, Seed, StepError,
};

/// Shortest pacing interval accepted by [`Simulation::set_replan_interval`].
pub const MIN_REPLAN_INTERVAL: Duration = Duration::from_millis(1);

/// Default delay between paced steps.
pub const DEFAULT_REPLAN_INTERVAL: Duration = Duration::from_millis(100);

/// Owned, read-only view of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderData {
    pub known_grid: Grid,
    pub true_grid: Grid,
    pub distance_map: DistanceMap,
    pub position: Position,
    pub heading: Heading,
    pub start: Position,
    pub goal: Position,
    pub step_count: u64,
    pub ideal_step_count: Option<u32>,
    pub phase: Phase,
    pub path: Vec<Position>,
    pub seed: u64,
    pub running: bool,
}

/// Identity of a freshly generated maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSummary {
    pub seed: u64,
    pub height: u32,
    pub width: u32,
    pub start: Position,
    pub goal: Position,
    pub ideal_steps: Option<u32>,
}

impl MazeSummary {
    pub fn of(maze: &Maze) -> Self {
        let dimensions = maze.grid().dimensions();
        Self {
            seed: maze.seed(),
            height: dimensions.height,
            width: dimensions.width,
            start: maze.start(),
            goal: maze.goal(),
            ideal_steps: maze.ideal_step_count(),
        }
    }
}

pub struct Simulation {
    maze: Maze,
    state: AgentState,
    maze_config: MazeConfig,
    agent_config: AgentConfig,
    perception: Perception,
    ideal_steps: Option<u32>,
    running: bool,
    replan_interval: Duration,
}

impl Simulation {
    /// Generates the first maze from `maze_config`. Even dimensions are bumped
    /// to the next odd value before generation.
    pub fn new(maze_config: MazeConfig, agent_config: AgentConfig) -> Result<Self, GenerateError> {
        let maze_config = maze_config.normalized();
        let maze = generate_maze(&maze_config, maze_config.seed)?;
        Ok(Self::assemble(maze, maze_config, agent_config))
    }

    /// Wraps an existing maze, e.g. a hand-built fixture.
    pub fn from_maze(maze: Maze, agent_config: AgentConfig) -> Self {
        let dimensions = maze.grid().dimensions();
        let maze_config =
            MazeConfig::new(dimensions.height, dimensions.width).with_seed(maze.seed());
        Self::assemble(maze, maze_config, agent_config)
    }

    fn assemble(maze: Maze, maze_config: MazeConfig, agent_config: AgentConfig) -> Self {
        let state = AgentState::new(&maze, &agent_config);
        let ideal_steps = maze.ideal_step_count();
        Self {
            perception: Perception::from_config(&agent_config),
            maze,
            state,
            maze_config,
            agent_config,
            ideal_steps,
            running: false,
            replan_interval: DEFAULT_REPLAN_INTERVAL,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn maze_config(&self) -> &MazeConfig {
        &self.maze_config
    }

    pub fn agent_config(&self) -> &AgentConfig {
        &self.agent_config
    }

    pub fn ideal_steps(&self) -> Option<u32> {
        self.ideal_steps
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Lets the pacing clock drive the agent. A finished agent stays paused.
    /// Returns the new running flag.
    pub fn start(&mut self) -> bool {
        self.running = !self.state.is_done();
        self.running
    }

    pub fn pause(&mut self) -> bool {
        self.running = false;
        self.running
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Executes exactly one phase, ignoring the running flag.
    ///
    /// The run stops when the agent reaches the goal or the phase fails.
    pub fn advance(&mut self) -> Result<PhaseOutcome, StepError> {
        let result = AgentEngine::new(&mut self.state, &self.maze, self.perception).advance();
        if result.is_err() || self.state.is_done() {
            self.running = false;
        }
        result
    }

    /// One tick of the pacing clock.
    ///
    /// A pure distance refresh does not use up the tick, so the heading
    /// choice that follows it lands in the same tick. `on_phase` sees every
    /// executed phase before the next one runs, including the phases that
    /// precede a failure.
    pub fn paced_step<F>(&mut self, mut on_phase: F) -> Result<(), StepError>
    where
        F: FnMut(&Self, PhaseOutcome),
    {
        let first = self.advance()?;
        on_phase(self, first);
        if first.is_distance_update() {
            let second = self.advance()?;
            on_phase(self, second);
        }
        Ok(())
    }

    /// Returns the agent to the start with heading North, keeping its map.
    pub fn reset_robot(&mut self) {
        self.running = false;
        self.state.reset_robot(&self.maze);
        info!(start = %self.maze.start(), "robot reset");
    }

    /// Forgets every observed wall and returns the agent to the start.
    /// The true maze is kept.
    pub fn reset_maze(&mut self) {
        self.running = false;
        self.state.reset_knowledge(&self.maze, &self.agent_config);
        info!(seed = self.maze.seed(), "maze knowledge reset");
    }

    /// Replaces the true maze, then performs [`Simulation::reset_maze`].
    ///
    /// `None` keeps the current height or width; a missing seed draws a
    /// fresh one. On error the current maze is left untouched.
    pub fn new_maze(
        &mut self,
        seed: Option<Seed>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<MazeSummary, GenerateError> {
        let mut config = self.maze_config.clone();
        if let Some(width) = width {
            config.width = width;
        }
        if let Some(height) = height {
            config.height = height;
        }
        config.seed = seed.unwrap_or_default();
        let config = config.normalized();

        let maze = generate_maze(&config, config.seed)?;
        self.maze = maze;
        self.maze_config = config;
        self.ideal_steps = self.maze.ideal_step_count();
        self.reset_maze();

        Ok(MazeSummary::of(&self.maze))
    }

    pub fn render_data(&self) -> RenderData {
        RenderData {
            known_grid: self.state.known.clone(),
            true_grid: self.maze.grid().clone(),
            distance_map: self.state.distances.clone(),
            position: self.state.position,
            heading: self.state.heading,
            start: self.maze.start(),
            goal: self.maze.goal(),
            step_count: self.state.step_count,
            ideal_step_count: self.ideal_steps,
            phase: self.state.phase,
            path: self.state.path.clone(),
            seed: self.maze.seed(),
            running: self.running,
        }
    }

    pub fn replan_interval(&self) -> Duration {
        self.replan_interval
    }

    /// Values below [`MIN_REPLAN_INTERVAL`] are raised to it.
    pub fn set_replan_interval(&mut self, interval: Duration) {
        self.replan_interval = interval.max(MIN_REPLAN_INTERVAL);
        debug!(interval_ms = self.replan_interval.as_millis() as u64, "replan interval set");
    }
}

fn generate_maze(config: &MazeConfig, seed: Seed) -> Result<Maze, GenerateError> {
    let seed = seed.resolve();
    let maze = MazeGenerator::from_config(config).generate(config.height, config.width, seed)?;
    info!(
        seed,
        height = config.height,
        width = config.width,
        start = %maze.start(),
        goal = %maze.goal(),
        "maze generated"
    );
    Ok(maze)
}
