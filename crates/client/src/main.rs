//! Headless maze exploration client.
//!
//! Loads configuration from the environment, generates a maze, lets the agent
//! explore it on the runtime's pacing clock and prints a summary once the
//! goal is reached, a step fails, or the optional time limit runs out.
//!
//! # Examples
//!
//! ```bash
//! MAZE_WIDTH=31 MAZE_HEIGHT=21 MAZE_SEED=7 cargo run -p maze-client
//! MAZE_OUTPUT=json MAZE_REPLAN_INTERVAL_MS=1 cargo run -p maze-client
//! ```

mod config;
mod logging;
mod summary;

use anyhow::Result;
use tokio::sync::broadcast::{self, error::RecvError};

use config::{ClientConfig, OutputFormat};
use runtime::{Event, Runtime, Topic};
use summary::{RunOutcome, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let log_guard = logging::setup_logging(config.session_id.as_deref())?;
    config.report_rejected();

    let maze = &config.runtime.maze;
    tracing::info!(
        height = maze.height,
        width = maze.width,
        seed = %maze.seed,
        replan_ms = config.runtime.replan_interval.as_millis() as u64,
        "Starting maze client"
    );

    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .build()
        .await?;
    let handle = runtime.handle();
    let mut agent_events = handle.subscribe(Topic::Agent);

    let outcome = if handle.start().await? {
        let run = wait_for_finish(&mut agent_events);
        match config.max_runtime {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .unwrap_or(RunOutcome::TimedOut),
            None => run.await,
        }
    } else {
        // Start already equals the goal.
        RunOutcome::GoalReached
    };

    handle.pause().await?;
    let render = handle.render_data().await?;
    drop(handle);
    runtime.shutdown().await?;

    tracing::info!(
        outcome = %outcome,
        steps = render.step_count,
        ideal_steps = ?render.ideal_step_count,
        "Run finished"
    );

    let report = RunReport::new(outcome, render);
    match config.output {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if !report.outcome.is_success() {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

/// Follows agent events until the run ends one way or another.
async fn wait_for_finish(events: &mut broadcast::Receiver<Event>) -> RunOutcome {
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(Event::GoalReached { .. }) => return RunOutcome::GoalReached,
                Ok(Event::StepFailed { error }) => return RunOutcome::step_failed(&error),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event receiver lagged");
                }
                Err(RecvError::Closed) => return RunOutcome::Interrupted,
            },
            _ = &mut interrupt => {
                tracing::warn!("Interrupted, stopping run");
                return RunOutcome::Interrupted;
            }
        }
    }
}
