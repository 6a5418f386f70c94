//! Runtime orchestration for the maze exploration simulation.
//!
//! This crate wraps the synchronous `maze-core` agent in a control surface,
//! gives it a pacing clock on a tokio worker task, and publishes its progress
//! on a topic-based event bus. Consumers embed [`Runtime`] and interact with
//! the simulation through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`simulation`] is the single-owner controller and render snapshot
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod simulation;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, PhaseEvent, ResetScope, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use simulation::{
    DEFAULT_REPLAN_INTERVAL, MIN_REPLAN_INTERVAL, MazeSummary, RenderData, Simulation,
};
