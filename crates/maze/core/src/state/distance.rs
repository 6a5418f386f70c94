//! Steps-to-goal distance field and the breadth-first flood fill that builds it.

use std::collections::VecDeque;
use std::fmt;

use super::{Grid, GridDimensions, Heading, Position};

/// Hop count to the goal; [`Distance::UNREACHABLE`] orders above every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distance(u32);

impl Distance {
    pub const ZERO: Self = Self(0);
    pub const UNREACHABLE: Self = Self(u32::MAX);

    pub const fn new(steps: u32) -> Self {
        Self(steps)
    }

    pub const fn is_reachable(self) -> bool {
        self.0 != u32::MAX
    }

    /// Finite step count, `None` when unreachable.
    pub const fn steps(self) -> Option<u32> {
        if self.is_reachable() {
            Some(self.0)
        } else {
            None
        }
    }

    fn successor(self) -> Self {
        Self(self.0.saturating_add(1).min(u32::MAX - 1))
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self::UNREACHABLE
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.steps() {
            Some(steps) => write!(f, "{steps}"),
            None => f.write_str("∞"),
        }
    }
}

/// Distances over the extent of the grid they were computed from.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMap {
    dimensions: GridDimensions,
    values: Vec<Distance>,
}

impl DistanceMap {
    /// Map of the given extent with every cell unreachable.
    pub fn unreachable(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            values: vec![Distance::UNREACHABLE; dimensions.area()],
        }
    }

    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions.contains(position).then(|| {
            position.row as usize * self.dimensions.width as usize + position.col as usize
        })
    }

    /// Distance at `position`; anything outside the map's extent is unreachable.
    pub fn get(&self, position: Position) -> Distance {
        self.index(position)
            .map_or(Distance::UNREACHABLE, |index| self.values[index])
    }

    fn set(&mut self, position: Position, distance: Distance) {
        if let Some(index) = self.index(position) {
            self.values[index] = distance;
        }
    }

    pub fn reachable_count(&self) -> usize {
        self.values.iter().filter(|d| d.is_reachable()).count()
    }

    /// Row-major iterator over `(position, distance)`.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Distance)> + '_ {
        let width = self.dimensions.width.max(1) as usize;
        self.values.iter().enumerate().map(move |(index, &distance)| {
            let position = Position::new((index / width) as i32, (index % width) as i32);
            (position, distance)
        })
    }
}

impl fmt::Debug for DistanceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DistanceMap {}x{}",
            self.dimensions.height, self.dimensions.width
        )?;
        for row in self.values.chunks(self.dimensions.width.max(1) as usize) {
            let line: Vec<String> = row.iter().map(Distance::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Breadth-first search from `goal` over the free cells of `grid`.
///
/// The goal always gets distance 0 when it lies inside the grid; if it does
/// not, every cell is unreachable. Discovery order under unit edge weights is
/// already a shortest-path order, so each cell is enqueued at most once.
pub fn flood_fill(grid: &Grid, goal: Position) -> DistanceMap {
    let mut distances = DistanceMap::unreachable(grid.dimensions());
    if !grid.contains(goal) {
        return distances;
    }

    let mut queue = VecDeque::with_capacity(grid.dimensions().area());
    distances.set(goal, Distance::ZERO);
    queue.push_back(goal);

    while let Some(current) = queue.pop_front() {
        let next = distances.get(current).successor();
        for heading in Heading::ALL {
            let neighbor = current.neighbor(heading);
            if grid.is_free(neighbor) && distances.get(neighbor) > next {
                distances.set(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::parse(
            "
            #####
            #...#
            ###.#
            #...#
            #####
            ",
        )
        .unwrap()
    }

    #[test]
    fn distances_increase_along_corridor() {
        let goal = Position::new(1, 1);
        let distances = flood_fill(&corridor(), goal);

        let path = [(1, 1), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2), (3, 1)];
        for (expected, &(row, col)) in path.iter().enumerate() {
            assert_eq!(
                distances.get(Position::new(row, col)),
                Distance::new(expected as u32)
            );
        }
        assert_eq!(distances.reachable_count(), path.len());
    }

    #[test]
    fn walls_and_sealed_cells_are_unreachable() {
        let grid = Grid::parse(
            "
            #####
            #..##
            ####.
            #...#
            #####
            ",
        )
        .unwrap();
        let distances = flood_fill(&grid, Position::new(1, 1));

        assert_eq!(distances.get(Position::new(1, 2)), Distance::new(1));
        assert_eq!(distances.get(Position::new(0, 0)), Distance::UNREACHABLE);
        assert_eq!(distances.get(Position::new(3, 2)), Distance::UNREACHABLE);
        assert_eq!(distances.get(Position::new(2, 4)), Distance::UNREACHABLE);
        assert_eq!(distances.get(Position::new(9, 9)), Distance::UNREACHABLE);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let grid = corridor();
        let goal = Position::new(3, 1);
        assert_eq!(flood_fill(&grid, goal), flood_fill(&grid, goal));
    }

    #[test]
    fn goal_outside_grid_yields_unreachable_map() {
        let distances = flood_fill(&corridor(), Position::new(7, 7));
        assert_eq!(distances.reachable_count(), 0);
    }

    #[test]
    fn unreachable_orders_last() {
        assert!(Distance::new(u32::MAX - 1) < Distance::UNREACHABLE);
        assert_eq!(Distance::UNREACHABLE.to_string(), "∞");
        assert_eq!(Distance::new(4).steps(), Some(4));
    }
}
