//! Topic-based event bus for runtime events.
//!
//! Events are published to a topic and consumers subscribe only to the topics
//! they need: [`Topic::Agent`] for per-phase progress and run state,
//! [`Topic::Maze`] for generation and resets.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{PhaseEvent, ResetScope};
