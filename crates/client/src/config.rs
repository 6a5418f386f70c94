//! Client configuration structures and loaders.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use maze_core::{KnownGridInit, MazeConfig, Seed};
use runtime::RuntimeConfig;

/// How the run summary is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// An environment variable that was set but could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedVar {
    pub key: &'static str,
    pub value: String,
}

/// Configuration required to run one headless exploration.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Give up after this long; `None` runs until the goal or a failure.
    pub max_runtime: Option<Duration>,
    pub session_id: Option<String>,
    pub output: OutputFormat,
    /// Variables that fell back to their defaults.
    pub rejected: Vec<RejectedVar>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MAZE_WIDTH` / `MAZE_HEIGHT` - Grid size, even values bumped to odd (default: 51)
    /// - `MAZE_SEED` - Integer seed or `random` (default: random)
    /// - `MAZE_ITERATION_FACTOR` - Origin-shift iterations per cell (default: 100)
    /// - `MAZE_VISION_RANGE` - Cells visible per ray (default: 2)
    /// - `MAZE_KNOWN_GRID` - `full` or `bounded` initial belief (default: full)
    /// - `MAZE_REPLAN_INTERVAL_MS` - Delay between paced steps (default: 100)
    /// - `MAZE_MAX_RUNTIME_SECS` - Abort the run after this long, 0 for no limit (default: none)
    /// - `MAZE_SESSION_ID` - Log directory name (default: timestamp based)
    /// - `MAZE_OUTPUT` - `text` or `json` summary (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut reader = EnvReader {
            lookup,
            rejected: Vec::new(),
        };
        let mut config = Self::default();

        let maze = &mut config.runtime.maze;
        if let Some(width) = reader.read_dimension("MAZE_WIDTH") {
            maze.width = width;
        }
        if let Some(height) = reader.read_dimension("MAZE_HEIGHT") {
            maze.height = height;
        }
        if let Some(seed) = reader.read::<Seed>("MAZE_SEED") {
            maze.seed = seed;
        }
        if let Some(factor) = reader.read::<u64>("MAZE_ITERATION_FACTOR") {
            maze.iteration_factor = factor;
        }

        let agent = &mut config.runtime.agent;
        if let Some(range) = reader.read::<u32>("MAZE_VISION_RANGE") {
            agent.vision_range = range;
        }
        if let Some(init) = reader.read::<KnownGridInit>("MAZE_KNOWN_GRID") {
            agent.known_grid = init;
        }

        if let Some(millis) = reader.read::<u64>("MAZE_REPLAN_INTERVAL_MS") {
            config.runtime.replan_interval = Duration::from_millis(millis);
        }
        config.max_runtime = reader
            .read::<u64>("MAZE_MAX_RUNTIME_SECS")
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);
        config.session_id = (reader.lookup)("MAZE_SESSION_ID").filter(|id| !id.trim().is_empty());
        if let Some(output) = reader.read::<OutputFormat>("MAZE_OUTPUT") {
            config.output = output;
        }

        config.rejected = reader.rejected;
        config
    }

    /// Logs every variable that fell back to its default.
    pub fn report_rejected(&self) {
        for RejectedVar { key, value } in &self.rejected {
            warn!(key, value = %value, "ignoring malformed configuration value, using default");
        }
    }
}

struct EnvReader<F> {
    lookup: F,
    rejected: Vec<RejectedVar>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn read<T>(&mut self, key: &'static str) -> Option<T>
    where
        T: FromStr,
    {
        let value = (self.lookup)(key)?;
        match value.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.rejected.push(RejectedVar { key, value });
                None
            }
        }
    }

    fn read_dimension(&mut self, key: &'static str) -> Option<u32> {
        let value = self.read::<u32>(key)?;
        if value < MazeConfig::MIN_DIMENSION {
            self.rejected.push(RejectedVar {
                key,
                value: value.to_string(),
            });
            return None;
        }
        Some(value)
    }
}
