//! Ground-truth environment: the generated maze and the randomness behind it.
mod generator;
mod maze;
mod rng;

pub use generator::{MazeGenerator, generate};
pub use maze::{GenerateError, Maze};
pub use rng::{PcgRng, RngSource};
