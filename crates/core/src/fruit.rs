//! Fruit module - the single consumable on the board
//!
//! A fruit is nothing but a tile. Its color belongs to the presentation
//! palette. Respawning draws uniformly from the tiles that are free at that
//! moment, so the loop never has to retry.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, BoardObject, Occupant};
use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fruit {
    position: Position,
}

impl Fruit {
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl BoardObject for Fruit {
    fn occupant(&self) -> Occupant {
        Occupant::Fruit
    }

    fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.position)
    }
}

/// Uniformly random free tile, `None` when the board is full.
pub(crate) fn pick_free_tile<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.free_tiles().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_free_tile_skips_occupied() {
        let mut board = Board::new(1, 3);
        board.add_object(&Fruit::new(Position::new(0, 0))).unwrap();
        board.add_object(&Fruit::new(Position::new(0, 2))).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(pick_free_tile(&board, &mut rng), Some(Position::new(0, 1)));
        }
    }

    #[test]
    fn test_pick_free_tile_on_full_board() {
        let mut board = Board::new(1, 1);
        board.add_object(&Fruit::new(Position::new(0, 0))).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_free_tile(&board, &mut rng), None);
    }

    #[test]
    fn test_pick_free_tile_reaches_every_free_tile() {
        let board = Board::new(2, 2);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_free_tile(&board, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 4);
    }
}
