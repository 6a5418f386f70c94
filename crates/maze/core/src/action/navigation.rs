use super::movement::AvailableMoves;
use crate::error::{ErrorSeverity, SimError};
use crate::state::{DistanceMap, Heading};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationError {
    #[error("no move is available from the current position")]
    NoReachableMove,
}

impl SimError for NavigationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoReachableMove => "no_reachable_move",
        }
    }
}

/// Maneuvers in increasing physical cost: straight, left, right, reverse.
fn preference_order(current: Heading) -> [Heading; 4] {
    [
        current,
        current.rotate_left(),
        current.rotate_right(),
        current.reverse(),
    ]
}

/// Picks the move whose target is closest to the goal.
///
/// Ties are broken by [`preference_order`]. An unreachable target is still a
/// candidate; it only wins when no finite-distance move exists.
pub fn choose_heading(
    moves: &AvailableMoves,
    current: Heading,
    distances: &DistanceMap,
) -> Result<Heading, NavigationError> {
    if let Some(single) = moves.only() {
        return Ok(single.heading);
    }

    let best = moves
        .iter()
        .map(|m| distances.get(m.target))
        .min()
        .ok_or(NavigationError::NoReachableMove)?;

    preference_order(current)
        .into_iter()
        .find(|&heading| {
            moves
                .get(heading)
                .is_some_and(|m| distances.get(m.target) == best)
        })
        .ok_or(NavigationError::NoReachableMove)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::available_moves;
    use crate::state::{Cell, Grid, Position, flood_fill};

    fn open_field() -> Grid {
        Grid::new(5, 5, Cell::Free)
    }

    #[test]
    fn prefers_straight_over_right_on_ties() {
        let grid = open_field();
        let here = Position::new(2, 2);
        // Goal diagonal to the north-east: North and East are both one step closer.
        let distances = flood_fill(&grid, Position::new(0, 4));
        let moves = available_moves(&grid, here);

        assert_eq!(
            choose_heading(&moves, Heading::North, &distances),
            Ok(Heading::North)
        );
        // Facing West, North is a right turn and East a reversal.
        assert_eq!(
            choose_heading(&moves, Heading::West, &distances),
            Ok(Heading::North)
        );
    }

    #[test]
    fn prefers_left_over_right_on_ties() {
        let grid = open_field();
        let distances = flood_fill(&grid, Position::new(0, 4));
        let moves = available_moves(&grid, Position::new(2, 2));

        // Facing South: East is a left turn, North a reversal.
        assert_eq!(
            choose_heading(&moves, Heading::South, &distances),
            Ok(Heading::East)
        );
    }

    #[test]
    fn strictly_closer_move_beats_preference() {
        let grid = open_field();
        let distances = flood_fill(&grid, Position::new(4, 2));
        let moves = available_moves(&grid, Position::new(2, 2));

        assert_eq!(
            choose_heading(&moves, Heading::North, &distances),
            Ok(Heading::South)
        );
    }

    #[test]
    fn unreachable_candidates_still_resolve() {
        let grid = open_field();
        let moves = available_moves(&grid, Position::new(2, 2));
        let distances = DistanceMap::unreachable(grid.dimensions());

        assert_eq!(
            choose_heading(&moves, Heading::East, &distances),
            Ok(Heading::East)
        );
    }

    #[test]
    fn single_move_skips_distances() {
        let grid = Grid::parse(
            "
            ###
            #.#
            #.#
            ",
        )
        .unwrap();
        let moves = available_moves(&grid, Position::new(1, 1));
        let distances = DistanceMap::unreachable(grid.dimensions());

        assert_eq!(
            choose_heading(&moves, Heading::North, &distances),
            Ok(Heading::South)
        );
    }

    #[test]
    fn enclosed_agent_has_no_move() {
        let grid = Grid::parse(
            "
            ###
            #.#
            ###
            ",
        )
        .unwrap();
        let moves = available_moves(&grid, Position::new(1, 1));
        let distances = flood_fill(&grid, Position::new(1, 1));

        let error = choose_heading(&moves, Heading::North, &distances).unwrap_err();
        assert_eq!(error, NavigationError::NoReachableMove);
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
    }
}
