//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! controlling the simulation or streaming events from specific topics.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use maze_core::{PhaseOutcome, Seed};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::simulation::{MazeSummary, RenderData};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Let the pacing clock drive the agent. Returns the new running flag,
    /// which stays `false` once the goal has been reached.
    pub async fn start(&self) -> Result<bool> {
        self.request(|reply| Command::Start { reply }).await
    }

    pub async fn pause(&self) -> Result<bool> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn toggle_pause(&self) -> Result<bool> {
        self.request(|reply| Command::TogglePause { reply }).await
    }

    /// Execute a single phase regardless of the running flag
    pub async fn step(&self) -> Result<PhaseOutcome> {
        self.request(|reply| Command::Step { reply }).await?
    }

    pub async fn reset_robot(&self) -> Result<()> {
        self.request(|reply| Command::ResetRobot { reply }).await
    }

    pub async fn reset_maze(&self) -> Result<()> {
        self.request(|reply| Command::ResetMaze { reply }).await
    }

    /// Regenerate the true maze and forget everything observed so far.
    ///
    /// `None` keeps the current dimension; a missing seed draws a fresh one.
    pub async fn new_maze(
        &self,
        seed: Option<Seed>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<MazeSummary> {
        self.request(|reply| Command::NewMaze {
            seed,
            width,
            height,
            reply,
        })
        .await?
    }

    pub async fn set_replan_interval(&self, interval: Duration) -> Result<()> {
        self.request(|reply| Command::SetReplanInterval { interval, reply })
            .await
    }

    /// Query the current render snapshot (read-only)
    pub async fn render_data(&self) -> Result<RenderData> {
        self.request(|reply| Command::QueryRenderData { reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Agent` - Phases, goal reached, failures, run state
    /// - `Topic::Maze` - Maze generation and resets
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::{Event, Topic};
    ///
    /// let mut agent_rx = handle.subscribe(Topic::Agent);
    /// while let Ok(event) = agent_rx.recv().await {
    ///     if let Event::GoalReached { steps, .. } = event {
    ///         println!("solved in {steps} steps");
    ///     }
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
