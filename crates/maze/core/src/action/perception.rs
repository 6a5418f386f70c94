use crate::config::AgentConfig;
use crate::state::{Grid, Heading, Position};

/// Summary of one perception pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationReport {
    pub cells_observed: usize,
    /// Walls copied into cells the agent previously believed free.
    pub walls_revealed: usize,
    /// Whether the known grid had to grow.
    pub grew: bool,
}

/// Line-of-sight sensor looking front, left and right.
///
/// Walls are opaque and the true grid's edge acts as an implicit wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Perception {
    range: u32,
}

impl Perception {
    pub const fn new(range: u32) -> Self {
        Self { range }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.vision_range)
    }

    /// Copies what is visible from `position` facing `heading` into `known`.
    pub fn observe(
        &self,
        truth: &Grid,
        known: &mut Grid,
        position: Position,
        heading: Heading,
    ) -> ObservationReport {
        let mut report = ObservationReport::default();
        for ray in [heading, heading.rotate_left(), heading.rotate_right()] {
            for distance in 1..=self.range as i32 {
                let target = position.step(ray, distance);
                let Some(cell) = truth.get(target) else {
                    break;
                };

                report.grew |= known.grow_to_include(target);
                if cell.is_wall() && known.is_free(target) {
                    report.walls_revealed += 1;
                }
                known.set(target, cell);
                report.cells_observed += 1;

                if cell.is_wall() {
                    break;
                }
            }
        }
        report
    }
}

impl Default for Perception {
    fn default() -> Self {
        Self::new(AgentConfig::DEFAULT_VISION_RANGE)
    }
}
