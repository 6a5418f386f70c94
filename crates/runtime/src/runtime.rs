//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use maze_core::{AgentConfig, Maze, MazeConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus};
use crate::simulation::{DEFAULT_REPLAN_INTERVAL, MazeSummary, Simulation};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub maze: MazeConfig,
    pub agent: AgentConfig,
    /// Delay between paced steps while running.
    pub replan_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            agent: AgentConfig::default(),
            replan_interval: DEFAULT_REPLAN_INTERVAL,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates the maze simulation
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped, so callers
    /// must release their clones before awaiting this.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    maze: Option<Maze>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            maze: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a prepared maze instead of generating one from the configuration
    pub fn maze(mut self, maze: Maze) -> Self {
        self.maze = Some(maze);
        self
    }

    /// Build the runtime and spawn the simulation worker
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeConfig {
            maze: maze_config,
            agent,
            replan_interval,
            event_buffer_size,
            command_buffer_size,
        } = self.config;

        let mut simulation = match self.maze {
            Some(maze) => Simulation::from_maze(maze, agent),
            None => Simulation::new(maze_config, agent)?,
        };
        simulation.set_replan_interval(replan_interval);

        let (command_tx, command_rx) = mpsc::channel::<Command>(command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        event_bus.publish(Event::MazeGenerated(MazeSummary::of(simulation.maze())));

        let sim_worker = SimulationWorker::new(simulation, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
