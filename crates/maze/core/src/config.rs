//! Tunable parameters for maze generation and the agent.

use std::fmt;
use std::str::FromStr;

/// Seed selection for a new maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seed {
    /// Draw a fresh seed from system entropy.
    #[default]
    Random,
    Fixed(u64),
}

impl Seed {
    /// Concrete seed, drawing from entropy for [`Seed::Random`].
    pub fn resolve(self) -> u64 {
        match self {
            Seed::Random => rand::random(),
            Seed::Fixed(seed) => seed,
        }
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Seed::Fixed(seed)
    }
}

impl From<Option<u64>> for Seed {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(Seed::Random, Seed::Fixed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid seed {0:?}: expected \"random\" or an unsigned integer")]
pub struct SeedParseError(pub String);

impl FromStr for Seed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("random") {
            return Ok(Seed::Random);
        }
        trimmed
            .parse()
            .map(Seed::Fixed)
            .map_err(|_| SeedParseError(s.to_owned()))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Random => f.write_str("random"),
            Seed::Fixed(seed) => write!(f, "{seed}"),
        }
    }
}

/// How the agent's belief grid is laid out before anything is observed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KnownGridInit {
    /// Same extent as the true maze, every cell assumed free.
    #[default]
    Full,
    /// Smallest rectangle anchored at the origin that holds start and goal;
    /// grows as perception reaches further.
    Bounded,
}

/// Bumps even dimensions to the next odd value.
pub const fn normalize_dimension(value: u32) -> u32 {
    if value % 2 == 0 { value + 1 } else { value }
}

/// Maze generation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeConfig {
    pub height: u32,
    pub width: u32,
    pub seed: Seed,
    /// Origin-shift iterations per grid cell.
    pub iteration_factor: u64,
}

impl MazeConfig {
    pub const DEFAULT_HEIGHT: u32 = 51;
    pub const DEFAULT_WIDTH: u32 = 51;
    pub const DEFAULT_ITERATION_FACTOR: u64 = 100;
    pub const MIN_DIMENSION: u32 = 3;

    pub fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Returns a copy with both dimensions bumped to odd values.
    pub fn normalized(&self) -> Self {
        Self {
            height: normalize_dimension(self.height),
            width: normalize_dimension(self.width),
            ..self.clone()
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            height: Self::DEFAULT_HEIGHT,
            width: Self::DEFAULT_WIDTH,
            seed: Seed::Random,
            iteration_factor: Self::DEFAULT_ITERATION_FACTOR,
        }
    }
}

/// Sensing and belief parameters for the agent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    /// Cells visible along each of the front, left and right rays.
    pub vision_range: u32,
    pub known_grid: KnownGridInit,
}

impl AgentConfig {
    pub const DEFAULT_VISION_RANGE: u32 = 2;
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            vision_range: Self::DEFAULT_VISION_RANGE,
            known_grid: KnownGridInit::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_dimensions_become_odd() {
        assert_eq!(normalize_dimension(10), 11);
        assert_eq!(normalize_dimension(11), 11);
        assert_eq!(normalize_dimension(0), 1);

        let config = MazeConfig::new(20, 7).normalized();
        assert_eq!((config.height, config.width), (21, 7));
    }

    #[test]
    fn seed_parsing() {
        assert_eq!("random".parse::<Seed>().unwrap(), Seed::Random);
        assert_eq!(" RANDOM ".parse::<Seed>().unwrap(), Seed::Random);
        assert_eq!("42".parse::<Seed>().unwrap(), Seed::Fixed(42));
        assert!("-3".parse::<Seed>().is_err());
        assert!("abc".parse::<Seed>().is_err());
        assert_eq!(Seed::Fixed(7).resolve(), 7);
    }

    #[test]
    fn known_grid_init_parses() {
        assert_eq!(
            "bounded".parse::<KnownGridInit>().unwrap(),
            KnownGridInit::Bounded
        );
        assert_eq!(KnownGridInit::Full.to_string(), "full");
    }
}
