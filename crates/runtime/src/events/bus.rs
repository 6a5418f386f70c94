//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use maze_core::StepError;

use super::types::{PhaseEvent, ResetScope};
use crate::simulation::MazeSummary;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Agent progress (phases, goal, failures, run state)
    Agent,
    /// Maze lifecycle (generation, resets)
    Maze,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PhaseAdvanced(PhaseEvent),
    GoalReached {
        steps: u64,
        ideal_steps: Option<u32>,
    },
    /// A phase failed; the run has been paused.
    StepFailed { error: StepError },
    RunStateChanged { running: bool },
    MazeGenerated(MazeSummary),
    Reset { scope: ResetScope },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::PhaseAdvanced(_)
            | Event::GoalReached { .. }
            | Event::StepFailed { .. }
            | Event::RunStateChanged { .. } => Topic::Agent,
            Event::MazeGenerated(_) | Event::Reset { .. } => Topic::Maze,
        }
    }
}

/// Topic-based event bus
///
/// Each topic is its own broadcast channel, so a slow consumer of one topic
/// never lags another. Publishing is best-effort: events sent while nobody
/// is subscribed are dropped.
#[derive(Clone)]
pub struct EventBus {
    agent: broadcast::Sender<Event>,
    maze: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            agent: broadcast::channel(capacity).0,
            maze: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Agent => &self.agent,
            Topic::Maze => &self.maze,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
