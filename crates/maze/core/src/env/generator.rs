//! Perfect-maze generation by origin shift.
//!
//! Tree cells sit on even coordinates and every non-origin cell points along
//! its unique path toward a moving origin. Each iteration the origin jumps two
//! cells in a random direction: the cell it leaves (and the connector it
//! crosses) now point at the new origin, and the new origin's former outgoing
//! edge is walled off. The pointer graph stays a spanning tree rooted at the
//! origin after every jump, so the stripped wall/free layout is always a
//! perfect maze.

use arrayvec::ArrayVec;
use tracing::debug;

use super::maze::{GenerateError, Maze};
use super::rng::{PcgRng, RngSource};
use crate::config::MazeConfig;
use crate::state::{Cell, Grid, Heading, Position};

/// Per-cell bookkeeping while the tree is being reshaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Wall,
    Origin,
    Toward(Heading),
}

struct LinkGrid {
    height: i32,
    width: i32,
    links: Vec<Link>,
}

impl LinkGrid {
    /// Boustrophedon baseline: even rows run East, the last column runs South,
    /// odd rows are wall except their last column. Origin at the bottom-right.
    fn baseline(height: i32, width: i32) -> Self {
        let mut links = Vec::with_capacity((height * width) as usize);
        for row in 0..height {
            for col in 0..width {
                let link = if col == width - 1 {
                    Link::Toward(Heading::South)
                } else if row % 2 == 0 {
                    Link::Toward(Heading::East)
                } else {
                    Link::Wall
                };
                links.push(link);
            }
        }

        let mut grid = Self {
            height,
            width,
            links,
        };
        grid.set(Position::new(height - 1, width - 1), Link::Origin);
        grid
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.row >= 0
            && position.col >= 0
            && position.row < self.height
            && position.col < self.width)
            .then(|| (position.row * self.width + position.col) as usize)
    }

    fn get(&self, position: Position) -> Option<Link> {
        self.index(position).map(|index| self.links[index])
    }

    fn set(&mut self, position: Position, link: Link) {
        if let Some(index) = self.index(position) {
            self.links[index] = link;
        }
    }

    /// Tree cells two steps away from `origin`, in compass order.
    fn jump_candidates(&self, origin: Position) -> ArrayVec<(Heading, Position), 4> {
        Heading::ALL
            .into_iter()
            .filter_map(|heading| {
                let target = origin.step(heading, 2);
                match self.get(target) {
                    Some(Link::Wall) | None => None,
                    Some(_) => Some((heading, target)),
                }
            })
            .collect()
    }

    fn into_grid(self) -> Grid {
        let mut grid = Grid::new(self.height as u32, self.width as u32, Cell::Free);
        for (index, link) in self.links.iter().enumerate() {
            if *link == Link::Wall {
                let position = Position::new(index as i32 / self.width, index as i32 % self.width);
                grid.set(position, Cell::Wall);
            }
        }
        grid
    }
}

/// Origin-shift maze generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGenerator {
    iteration_factor: u64,
    iterations: Option<u64>,
}

impl MazeGenerator {
    pub fn new() -> Self {
        Self {
            iteration_factor: MazeConfig::DEFAULT_ITERATION_FACTOR,
            iterations: None,
        }
    }

    pub fn from_config(config: &MazeConfig) -> Self {
        Self::new().with_iteration_factor(config.iteration_factor)
    }

    /// Iterations per cell when no absolute budget is set.
    pub fn with_iteration_factor(mut self, factor: u64) -> Self {
        self.iteration_factor = factor;
        self
    }

    /// Absolute iteration budget, overriding the per-cell factor.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    fn budget(&self, height: u32, width: u32) -> u64 {
        self.iterations
            .unwrap_or_else(|| height as u64 * width as u64 * self.iteration_factor)
    }

    /// Generates a maze from an explicit seed using [`PcgRng`].
    pub fn generate(&self, height: u32, width: u32, seed: u64) -> Result<Maze, GenerateError> {
        let mut rng = PcgRng::from_seed(seed);
        self.generate_with(height, width, seed, &mut rng)
    }

    /// Generates a maze drawing from `rng`; `seed` is only recorded on the result.
    pub fn generate_with<R: RngSource>(
        &self,
        height: u32,
        width: u32,
        seed: u64,
        rng: &mut R,
    ) -> Result<Maze, GenerateError> {
        validate_dimensions(height, width)?;

        let (h, w) = (height as i32, width as i32);
        let mut links = LinkGrid::baseline(h, w);
        let mut origin = Position::new(h - 1, w - 1);

        let budget = self.budget(height, width);
        let mut performed = 0u64;
        while performed < budget {
            let candidates = links.jump_candidates(origin);
            if candidates.is_empty() {
                break;
            }
            let (heading, next) = candidates[rng.below(candidates.len())];
            let crossed = origin.neighbor(heading);

            // Seal the new origin's old edge before re-pointing; when that edge
            // is the crossed connector it is reopened just below.
            if let Some(Link::Toward(old)) = links.get(next) {
                links.set(next.neighbor(old), Link::Wall);
            }
            links.set(origin, Link::Toward(heading));
            links.set(crossed, Link::Toward(heading));
            links.set(next, Link::Origin);

            origin = next;
            performed += 1;
        }

        let goal = origin;
        let start = far_corner(goal, h, w);
        debug!(
            seed,
            height,
            width,
            iterations = performed,
            %start,
            %goal,
            "generated maze"
        );

        Ok(Maze::new_unchecked(links.into_grid(), start, goal, seed))
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest cell count whose row-major offsets still fit in `i32` coordinates.
const MAX_AREA: u64 = i32::MAX as u64;

fn validate_dimensions(height: u32, width: u32) -> Result<(), GenerateError> {
    let valid = |value: u32| value >= MazeConfig::MIN_DIMENSION && value % 2 == 1;
    let area = u64::from(height) * u64::from(width);
    if valid(height) && valid(width) && area <= MAX_AREA {
        Ok(())
    } else {
        Err(GenerateError::InvalidDimensions { height, width })
    }
}

/// Corner of the quadrant opposite to `goal`.
fn far_corner(goal: Position, height: i32, width: i32) -> Position {
    let row = if goal.row > height / 2 { 0 } else { height - 1 };
    let col = if goal.col > width / 2 { 0 } else { width - 1 };
    Position::new(row, col)
}

/// Generates a maze with the default iteration budget.
///
/// Without a seed one is drawn from system entropy; it is recorded on the
/// returned [`Maze`] so the layout can be reproduced.
pub fn generate(height: u32, width: u32, seed: Option<u64>) -> Result<Maze, GenerateError> {
    validate_dimensions(height, width)?;
    let seed = seed.unwrap_or_else(rand::random);
    MazeGenerator::new().generate(height, width, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_even_or_tiny_dimensions() {
        for (height, width) in [(4, 5), (5, 4), (1, 5), (5, 1), (0, 0)] {
            assert_eq!(
                generate(height, width, Some(1)),
                Err(GenerateError::InvalidDimensions { height, width })
            );
        }
    }

    #[test]
    fn baseline_without_iterations_is_a_serpentine() {
        let maze = MazeGenerator::new()
            .with_iterations(0)
            .generate(5, 5, 0)
            .unwrap();

        let expected = Grid::parse(
            "
            .....
            ####.
            .....
            ####.
            .....
            ",
        )
        .unwrap();
        assert_eq!(maze.grid(), &expected);
        assert_eq!(maze.goal(), Position::new(4, 4));
        assert_eq!(maze.start(), Position::new(0, 0));
    }

    #[test]
    fn odd_odd_cells_stay_walls_and_even_even_cells_stay_free() {
        let maze = generate(11, 15, Some(5)).unwrap();
        for (position, cell) in maze.grid().iter() {
            match (position.row % 2, position.col % 2) {
                (1, 1) => assert_eq!(cell, Cell::Wall, "{position}"),
                (0, 0) => assert_eq!(cell, Cell::Free, "{position}"),
                _ => {}
            }
        }
    }

    #[test]
    fn start_lies_in_the_opposite_quadrant() {
        for seed in 0..20 {
            let maze = generate(9, 9, Some(seed)).unwrap();
            let (goal, start) = (maze.goal(), maze.start());
            assert_eq!(start.row == 0, goal.row > 4);
            assert_eq!(start.col == 0, goal.col > 4);
            assert!(maze.grid().is_free(start));
        }
    }

    #[test]
    fn iteration_budget_comes_from_config() {
        let config = MazeConfig {
            iteration_factor: 3,
            ..MazeConfig::new(7, 9)
        };
        let generator = MazeGenerator::from_config(&config);
        assert_eq!(generator.budget(7, 9), 189);
        assert_eq!(generator.with_iterations(10).budget(7, 9), 10);
    }
}
