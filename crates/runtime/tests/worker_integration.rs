//! End-to-end tests driving the simulation worker through a RuntimeHandle.

use std::time::Duration;

use maze_core::{
    Grid, Heading, Maze, MazeConfig, Phase, PhaseOutcome, Position, Seed, StepError,
};
use runtime::{Event, ResetScope, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(10);

fn fast_config(height: u32, width: u32, seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        maze: MazeConfig::new(height, width).with_seed(seed),
        replan_interval: Duration::from_millis(1),
        ..RuntimeConfig::default()
    }
}

/// Waits for the first event accepted by `select`, skipping lag notices.
async fn next_matching<T>(
    rx: &mut broadcast::Receiver<Event>,
    mut select: impl FnMut(Event) -> Option<T>,
) -> T {
    timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(found) = select(event) {
                        return found;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

async fn shutdown(runtime: Runtime, handle: RuntimeHandle) {
    drop(handle);
    timeout(WAIT, runtime.shutdown())
        .await
        .expect("worker did not stop")
        .expect("worker join failed");
}

#[tokio::test]
async fn paced_run_reaches_the_goal() {
    let runtime = Runtime::builder()
        .config(fast_config(11, 11, 3))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    assert!(handle.start().await.unwrap());
    let steps = next_matching(&mut agent, |event| match event {
        Event::GoalReached { steps, .. } => Some(steps),
        _ => None,
    })
    .await;

    let data = handle.render_data().await.unwrap();
    assert_eq!(data.step_count, steps);
    assert_eq!(data.position, data.goal);
    assert_eq!(data.phase, Phase::Done);
    assert!(data.ideal_step_count.is_some_and(|ideal| u64::from(ideal) <= steps));

    let stopped = next_matching(&mut agent, |event| match event {
        Event::RunStateChanged { running } => Some(running),
        _ => None,
    })
    .await;
    assert!(!stopped);
    assert!(!handle.render_data().await.unwrap().running);

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn manual_steps_work_while_paused() {
    let runtime = Runtime::builder()
        .config(fast_config(9, 9, 8))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    let outcome = handle.step().await.unwrap();
    assert!(matches!(outcome, PhaseOutcome::Observed { .. }));

    let event = next_matching(&mut agent, |event| match event {
        Event::PhaseAdvanced(phase) => Some(phase),
        _ => None,
    })
    .await;
    assert_eq!(event.outcome, outcome);
    assert_eq!(event.step_count, 0);

    let data = handle.render_data().await.unwrap();
    assert!(!data.running);
    assert!(matches!(data.phase, Phase::AwaitDecide | Phase::AwaitMove));

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn toggling_reports_run_state() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            replan_interval: Duration::from_secs(3600),
            ..fast_config(15, 15, 1)
        })
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    assert!(handle.toggle_pause().await.unwrap());
    assert!(!handle.toggle_pause().await.unwrap());
    assert!(!handle.pause().await.unwrap());

    let mut changes = Vec::new();
    while changes.len() < 2 {
        let running = next_matching(&mut agent, |event| match event {
            Event::RunStateChanged { running } => Some(running),
            _ => None,
        })
        .await;
        changes.push(running);
    }
    assert_eq!(changes, vec![true, false]);

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn new_maze_is_announced_on_the_maze_topic() {
    let runtime = Runtime::builder()
        .config(fast_config(9, 9, 2))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut maze = handle.subscribe(Topic::Maze);

    let summary = handle
        .new_maze(Some(Seed::Fixed(5)), Some(20), Some(16))
        .await
        .unwrap();
    assert_eq!((summary.height, summary.width), (17, 21));

    let announced = next_matching(&mut maze, |event| match event {
        Event::MazeGenerated(summary) => Some(summary),
        _ => None,
    })
    .await;
    assert_eq!(announced, summary);

    let scope = next_matching(&mut maze, |event| match event {
        Event::Reset { scope } => Some(scope),
        _ => None,
    })
    .await;
    assert_eq!(scope, ResetScope::Maze);

    let data = handle.render_data().await.unwrap();
    assert_eq!(data.seed, 5);
    assert_eq!(data.true_grid.dimensions().width, 21);

    let error = handle.new_maze(None, Some(1), Some(1)).await.unwrap_err();
    assert_eq!(error.error_code(), "invalid_dimensions");

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn folded_ticks_publish_each_phase_with_its_own_state() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            event_buffer_size: 4096,
            ..fast_config(11, 11, 3)
        })
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    assert!(handle.start().await.unwrap());
    let mut refreshes = 0;
    let mut choices = 0;
    timeout(WAIT, async {
        loop {
            match agent.recv().await {
                Ok(Event::PhaseAdvanced(event)) => match event.outcome {
                    outcome if outcome.is_distance_update() => {
                        assert_eq!(event.phase, Phase::AwaitDecide);
                        refreshes += 1;
                    }
                    PhaseOutcome::HeadingChosen { .. } => {
                        assert_eq!(event.phase, Phase::AwaitMove);
                        choices += 1;
                    }
                    _ => {}
                },
                Ok(Event::GoalReached { .. }) => break,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for the goal");

    assert!(refreshes > 0);
    assert!(choices > 0);

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn failing_tick_publishes_earlier_phases_before_the_failure() {
    let grid = Grid::parse(
        "
        ###.
        #.#.
        ###.
        ",
    )
    .unwrap();
    let maze = Maze::from_parts(grid, Position::new(1, 1), Position::new(0, 3), 0).unwrap();
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            replan_interval: Duration::from_millis(1),
            ..RuntimeConfig::default()
        })
        .maze(maze)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    assert!(handle.start().await.unwrap());
    let mut outcomes = Vec::new();
    let failed = next_matching(&mut agent, |event| match event {
        Event::PhaseAdvanced(event) => {
            outcomes.push(event.outcome);
            None
        }
        Event::StepFailed { error } => Some(error),
        _ => None,
    })
    .await;

    assert!(matches!(failed, StepError::NoReachableMove { .. }));
    assert!(matches!(
        outcomes.as_slice(),
        [PhaseOutcome::Observed { moves: 1, .. }, PhaseOutcome::Bumped { .. }]
    ));

    let stopped = next_matching(&mut agent, |event| match event {
        Event::RunStateChanged { running } => Some(running),
        _ => None,
    })
    .await;
    assert!(!stopped);

    shutdown(runtime, handle).await;
}

#[tokio::test]
async fn enclosed_agent_reports_step_failure() {
    let grid = Grid::parse(
        "
        ###.
        #.#.
        ###.
        ",
    )
    .unwrap();
    let maze = Maze::from_parts(grid, Position::new(1, 1), Position::new(0, 3), 0).unwrap();
    let runtime = Runtime::builder().maze(maze).build().await.unwrap();
    let handle = runtime.handle();
    let mut agent = handle.subscribe(Topic::Agent);

    handle.step().await.unwrap();
    assert!(matches!(
        handle.step().await.unwrap(),
        PhaseOutcome::Bumped { .. }
    ));

    let error = handle.step().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Step(StepError::NoReachableMove {
            heading: Heading::South,
            ..
        })
    ));
    assert!(!error.severity().is_recoverable());

    let failed = next_matching(&mut agent, |event| match event {
        Event::StepFailed { error } => Some(error),
        _ => None,
    })
    .await;
    assert_eq!(failed.position(), Position::new(1, 1));

    shutdown(runtime, handle).await;
}
