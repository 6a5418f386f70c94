use arrayvec::ArrayVec;

use crate::state::{Grid, Heading, Position};

/// One-step move: the heading taken and the cell it lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub heading: Heading,
    pub target: Position,
}

/// Moves open from a position according to the known grid, in compass order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvailableMoves {
    moves: ArrayVec<Move, 4>,
}

impl AvailableMoves {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, heading: Heading) -> Option<Move> {
        self.moves.iter().copied().find(|m| m.heading == heading)
    }

    pub fn contains(&self, heading: Heading) -> bool {
        self.get(heading).is_some()
    }

    /// The move when exactly one exists (a dead-end corridor).
    pub fn only(&self) -> Option<Move> {
        match self.moves.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }
}

/// Headings whose neighbour is inside the known grid and believed free.
pub fn available_moves(known: &Grid, position: Position) -> AvailableMoves {
    let moves = Heading::ALL
        .into_iter()
        .map(|heading| Move {
            heading,
            target: position.neighbor(heading),
        })
        .filter(|m| known.is_free(m.target))
        .collect::<ArrayVec<Move, 4>>();
    AvailableMoves { moves }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_free_in_bounds_neighbours() {
        let known = Grid::parse(
            "
            .#.
            ...
            .#.
            ",
        )
        .unwrap();

        let centre = available_moves(&known, Position::new(1, 1));
        let headings: Vec<Heading> = centre.iter().map(|m| m.heading).collect();
        assert_eq!(headings, vec![Heading::East, Heading::West]);
        assert_eq!(
            centre.get(Heading::East).map(|m| m.target),
            Some(Position::new(1, 2))
        );

        let corner = available_moves(&known, Position::new(0, 0));
        assert_eq!(
            corner.only(),
            Some(Move {
                heading: Heading::South,
                target: Position::new(1, 0)
            })
        );
    }

    #[test]
    fn open_cell_lists_every_heading_in_compass_order() {
        let known = Grid::new(3, 3, crate::state::Cell::Free);
        let moves = available_moves(&known, Position::new(1, 1));
        let headings: Vec<Heading> = moves.iter().map(|m| m.heading).collect();
        assert_eq!(headings, Heading::ALL.to_vec());
        assert!(moves.only().is_none());
    }
}
