use std::fmt;

use super::Position;

/// Occupancy of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Free,
    Wall,
}

impl Cell {
    pub const fn is_free(self) -> bool {
        matches!(self, Cell::Free)
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    const fn glyph(self) -> char {
        match self {
            Cell::Free => '.',
            Cell::Wall => '#',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub height: u32,
    pub width: u32,
}

impl GridDimensions {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row >= 0
            && position.col >= 0
            && i64::from(position.row) < i64::from(self.height)
            && i64::from(position.col) < i64::from(self.width)
    }

    pub const fn area(&self) -> usize {
        self.height as usize * self.width as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridParseError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },
}

/// Dense row-major wall/free grid.
///
/// Used both for the immutable ground-truth maze and for the agent's belief,
/// which may grow toward the bottom and right via [`Grid::grow_to_include`].
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    height: u32,
    width: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(height: u32, width: u32, fill: Cell) -> Self {
        Self {
            height,
            width,
            cells: vec![fill; height as usize * width as usize],
        }
    }

    pub fn with_dimensions(dimensions: GridDimensions, fill: Cell) -> Self {
        Self::new(dimensions.height, dimensions.width, fill)
    }

    /// Parses the ASCII form produced by `Display` (`#` wall, `.` free).
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let expected = rows.first().ok_or(GridParseError::Empty)?.chars().count();

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(GridParseError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    '.' => Cell::Free,
                    '#' => Cell::Wall,
                    _ => {
                        return Err(GridParseError::UnknownGlyph {
                            glyph,
                            position: Position::new(row as i32, col as i32),
                        });
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            height: rows.len() as u32,
            width: expected as u32,
            cells,
        })
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.height, self.width)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row as usize * self.width as usize + position.col as usize)
    }

    /// Cell at `position`, or `None` outside the grid.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|index| self.cells[index])
    }

    /// Writes `cell` at `position`. Returns false when out of bounds.
    pub fn set(&mut self, position: Position, cell: Cell) -> bool {
        match self.index(position) {
            Some(index) => {
                self.cells[index] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_free(&self, position: Position) -> bool {
        self.get(position).is_some_and(Cell::is_free)
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.get(position).is_some_and(Cell::is_wall)
    }

    /// Extends the grid with free rows at the bottom and free columns at the
    /// right until `position` is inside. Existing cells keep their coordinates.
    ///
    /// Negative coordinates cannot be reached by growth; returns whether the
    /// extent changed.
    pub fn grow_to_include(&mut self, position: Position) -> bool {
        if position.row < 0 || position.col < 0 || self.contains(position) {
            return false;
        }

        let height = self.height.max(position.row as u32 + 1);
        let width = self.width.max(position.col as u32 + 1);

        if width != self.width {
            let mut cells = Vec::with_capacity(height as usize * width as usize);
            for row in self.cells.chunks(self.width.max(1) as usize) {
                cells.extend_from_slice(row);
                cells.resize(cells.len() + (width - self.width) as usize, Cell::Free);
            }
            self.cells = cells;
            self.width = width;
        }
        self.cells
            .resize(height as usize * width as usize, Cell::Free);
        self.height = height;

        true
    }

    /// Adds one free row and one free column, clamped to `limit`.
    /// Returns false once the grid already spans `limit`.
    pub fn widen_toward(&mut self, limit: GridDimensions) -> bool {
        let height = self.height.saturating_add(1).min(limit.height).max(self.height);
        let width = self.width.saturating_add(1).min(limit.width).max(self.width);
        if (height, width) == (self.height, self.width) {
            return false;
        }
        self.grow_to_include(Position::new(height as i32 - 1, width as i32 - 1))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// All in-bounds positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32)
            .flat_map(move |row| (0..width).map(move |col| Position::new(row, col)))
    }

    /// Row-major iterator over `(position, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.height, self.width)?;
        fmt::Display::fmt(self, f)
    }
}
