use std::fmt;

/// Discrete grid position expressed as (row, column).
///
/// Coordinates are signed so that rays stepping past the top or left edge
/// stay representable; such positions are simply outside every grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Position reached by walking `steps` cells along `heading`.
    pub fn step(self, heading: Heading, steps: i32) -> Self {
        let (dr, dc) = heading.delta();
        Self::new(self.row + dr * steps, self.col + dc * steps)
    }

    /// Adjacent position along `heading`.
    pub fn neighbor(self, heading: Heading) -> Self {
        self.step(heading, 1)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Facing direction of the agent, cyclically ordered clockwise.
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
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings, clockwise from North.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Unit vector as (Δrow, Δcol). Rows grow southward.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (-1, 0),
            Heading::East => (0, 1),
            Heading::South => (1, 0),
            Heading::West => (0, -1),
        }
    }

    const fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    const fn rotated(self, quarter_turns: usize) -> Self {
        Self::ALL[(self.index() + quarter_turns) % 4]
    }

    /// 90° counter-clockwise.
    pub const fn rotate_left(self) -> Self {
        self.rotated(3)
    }

    /// 90° clockwise.
    pub const fn rotate_right(self) -> Self {
        self.rotated(1)
    }

    pub const fn reverse(self) -> Self {
        self.rotated(2)
    }
}
