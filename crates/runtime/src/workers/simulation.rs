//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the agent on a
//! pacing clock while running, and publishes events to the EventBus.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use maze_core::{PhaseOutcome, Seed, SimError, StepError};

use crate::api::Result;
use crate::events::{Event, EventBus, PhaseEvent, ResetScope};
use crate::simulation::{MazeSummary, RenderData, Simulation};

/// Commands that can be sent to the simulation worker
pub enum Command {
    Start {
        reply: oneshot::Sender<bool>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    TogglePause {
        reply: oneshot::Sender<bool>,
    },
    /// Execute one phase, whether or not the run is active.
    Step {
        reply: oneshot::Sender<Result<PhaseOutcome>>,
    },
    ResetRobot {
        reply: oneshot::Sender<()>,
    },
    ResetMaze {
        reply: oneshot::Sender<()>,
    },
    NewMaze {
        seed: Option<Seed>,
        width: Option<u32>,
        height: Option<u32>,
        reply: oneshot::Sender<Result<MazeSummary>>,
    },
    SetReplanInterval {
        interval: Duration,
        reply: oneshot::Sender<()>,
    },
    /// Query a render snapshot (read-only).
    QueryRenderData {
        reply: oneshot::Sender<RenderData>,
    },
}

/// Background task that processes control commands and paces the agent.
pub struct SimulationWorker {
    simulation: Simulation,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        simulation: Simulation,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            seed = simulation.maze().seed(),
            start = %simulation.maze().start(),
            goal = %simulation.maze().goal(),
            "SimulationWorker initialized"
        );

        Self {
            simulation,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every [`crate::RuntimeHandle`] is dropped.
    pub async fn run(mut self) {
        let mut ticker = pacing_clock(self.simulation.replan_interval());

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            ticker = pacing_clock(self.simulation.replan_interval());
                        }
                    }
                    None => break,
                },
                _ = ticker.tick(), if self.simulation.is_running() => {
                    self.handle_tick();
                }
            }
        }

        debug!(target: "runtime::worker", "command channel closed, worker exiting");
    }

    /// Returns whether the pacing clock must be restarted.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Start { reply } => {
                let was_running = self.simulation.is_running();
                let running = self.simulation.start();
                self.publish_run_state(was_running);
                send_reply(reply, running, "Start");
                running && !was_running
            }
            Command::Pause { reply } => {
                let was_running = self.simulation.is_running();
                let running = self.simulation.pause();
                self.publish_run_state(was_running);
                send_reply(reply, running, "Pause");
                false
            }
            Command::TogglePause { reply } => {
                let was_running = self.simulation.is_running();
                let running = self.simulation.toggle_pause();
                self.publish_run_state(was_running);
                send_reply(reply, running, "TogglePause");
                running && !was_running
            }
            Command::Step { reply } => {
                let result = self.step_once().map_err(Into::into);
                send_reply(reply, result, "Step");
                false
            }
            Command::ResetRobot { reply } => {
                let was_running = self.simulation.is_running();
                self.simulation.reset_robot();
                self.publish_run_state(was_running);
                self.event_bus.publish(Event::Reset {
                    scope: ResetScope::Robot,
                });
                send_reply(reply, (), "ResetRobot");
                false
            }
            Command::ResetMaze { reply } => {
                let was_running = self.simulation.is_running();
                self.simulation.reset_maze();
                self.publish_run_state(was_running);
                self.event_bus.publish(Event::Reset {
                    scope: ResetScope::Knowledge,
                });
                send_reply(reply, (), "ResetMaze");
                false
            }
            Command::NewMaze {
                seed,
                width,
                height,
                reply,
            } => {
                let was_running = self.simulation.is_running();
                let result = self.simulation.new_maze(seed, width, height);
                if let Ok(summary) = &result {
                    self.publish_run_state(was_running);
                    self.event_bus.publish(Event::MazeGenerated(*summary));
                    self.event_bus.publish(Event::Reset {
                        scope: ResetScope::Maze,
                    });
                }
                send_reply(reply, result.map_err(Into::into), "NewMaze");
                false
            }
            Command::SetReplanInterval { interval, reply } => {
                self.simulation.set_replan_interval(interval);
                send_reply(reply, (), "SetReplanInterval");
                true
            }
            Command::QueryRenderData { reply } => {
                send_reply(reply, self.simulation.render_data(), "QueryRenderData");
                false
            }
        }
    }

    fn handle_tick(&mut self) {
        let event_bus = &self.event_bus;
        let result = self
            .simulation
            .paced_step(|simulation, outcome| publish_outcome(event_bus, simulation, outcome));
        match result {
            Ok(()) => {
                if !self.simulation.is_running() {
                    self.publish_run_state(true);
                }
            }
            Err(step_error) => {
                self.publish_failure(step_error);
                self.publish_run_state(true);
            }
        }
    }

    fn step_once(&mut self) -> std::result::Result<PhaseOutcome, StepError> {
        let was_running = self.simulation.is_running();
        match self.simulation.advance() {
            Ok(outcome) => {
                publish_outcome(&self.event_bus, &self.simulation, outcome);
                self.publish_run_state(was_running);
                Ok(outcome)
            }
            Err(step_error) => {
                self.publish_failure(step_error);
                self.publish_run_state(was_running);
                Err(step_error)
            }
        }
    }

    fn publish_failure(&self, step_error: StepError) {
        error!(
            target: "runtime::worker",
            code = step_error.error_code(),
            severity = step_error.severity().as_str(),
            error = %step_error,
            "step failed, run paused"
        );
        self.event_bus.publish(Event::StepFailed { error: step_error });
    }

    /// Publishes `RunStateChanged` when the flag differs from `was_running`.
    fn publish_run_state(&self, was_running: bool) {
        let running = self.simulation.is_running();
        if running != was_running {
            debug!(target: "runtime::worker", running, "run state changed");
            self.event_bus.publish(Event::RunStateChanged { running });
        }
    }
}

fn publish_outcome(event_bus: &EventBus, simulation: &Simulation, outcome: PhaseOutcome) {
    let state = simulation.state();
    event_bus.publish(Event::PhaseAdvanced(PhaseEvent {
        outcome,
        phase: state.phase,
        position: state.position,
        step_count: state.step_count,
    }));

    if outcome.reached_goal() {
        let ideal_steps = simulation.ideal_steps();
        info!(
            target: "runtime::worker",
            steps = state.step_count,
            ideal_steps = ?ideal_steps,
            "goal reached"
        );
        event_bus.publish(Event::GoalReached {
            steps: state.step_count,
            ideal_steps,
        });
    }
}

fn pacing_clock(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn send_reply<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", command, "reply channel closed (caller dropped)");
    }
}
