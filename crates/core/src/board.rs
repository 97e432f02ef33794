//! Board module - manages the tile grid
//!
//! The board is an `nb_lines x nb_cols` grid where each tile is either empty or
//! holds one [`Occupant`]. Tiles are stored in a flat row-major vector
//! (`row * nb_cols + col`).
//!
//! The board also owns the single [`Fruit`] slot. Objects enter and leave the
//! grid through [`Board::add_object`] / [`Board::remove_object`]; the snake
//! keeps the grid in lock-step with its body through `occupy` / `vacate` while
//! it moves.

use std::collections::HashSet;

use rand::Rng;

use crate::error::BoardError;
use crate::fruit::{self, Fruit};
use crate::types::Position;

/// What sits on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Snake,
    Fruit,
}

/// Anything that can be registered on the board.
pub trait BoardObject {
    /// Kind written into every covered tile
    fn occupant(&self) -> Occupant;

    /// Tiles covered by the object
    fn tiles(&self) -> impl Iterator<Item = Position> + '_;
}

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    nb_lines: u16,
    nb_cols: u16,
    /// Flat array of tiles, row-major order
    tiles: Vec<Option<Occupant>>,
    fruit: Option<Fruit>,
}

impl Board {
    /// Create a new empty board
    pub fn new(nb_lines: u16, nb_cols: u16) -> Self {
        Self {
            nb_lines,
            nb_cols,
            tiles: vec![None; nb_lines as usize * nb_cols as usize],
            fruit: None,
        }
    }

    pub fn nb_lines(&self) -> u16 {
        self.nb_lines
    }

    pub fn nb_cols(&self) -> u16 {
        self.nb_cols
    }

    /// Total number of tiles
    pub fn capacity(&self) -> usize {
        self.tiles.len()
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.row as usize * self.nb_cols as usize + pos.col as usize)
    }

    fn position_of(&self, idx: usize) -> Position {
        let cols = self.nb_cols as usize;
        Position::new((idx / cols) as i32, (idx % cols) as i32)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.row < self.nb_lines as i32
            && pos.col >= 0
            && pos.col < self.nb_cols as i32
    }

    /// Wrap an off-grid position back onto the grid
    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrapped(self.nb_lines, self.nb_cols)
    }

    /// Occupant at `pos`, `None` for empty or out-of-bounds tiles
    pub fn occupant_at(&self, pos: Position) -> Option<Occupant> {
        self.index(pos).and_then(|idx| self.tiles[idx])
    }

    /// In bounds and empty
    pub fn is_free(&self, pos: Position) -> bool {
        matches!(self.index(pos).map(|idx| self.tiles[idx]), Some(None))
    }

    /// Register an object on the board.
    ///
    /// Nothing is written unless every covered tile is in bounds, empty and
    /// covered only once.
    pub fn add_object<O: BoardObject>(&mut self, object: &O) -> Result<(), BoardError> {
        let mut seen = HashSet::new();
        if let Some(bad) = object
            .tiles()
            .find(|&pos| !self.is_free(pos) || !seen.insert(pos))
        {
            return Err(BoardError::InvalidPlacement(bad));
        }

        let occupant = object.occupant();
        for pos in object.tiles() {
            self.set(pos, Some(occupant));
        }
        Ok(())
    }

    /// Deregister an object. Tiles that no longer hold the object's kind are left alone.
    pub fn remove_object<O: BoardObject>(&mut self, object: &O) {
        let occupant = object.occupant();
        for pos in object.tiles() {
            if self.occupant_at(pos) == Some(occupant) {
                self.set(pos, None);
            }
            if occupant == Occupant::Fruit
                && self.fruit.map(|f| f.position()) == Some(pos)
            {
                self.fruit = None;
            }
        }
    }

    /// Place a new fruit on a uniformly random free tile.
    ///
    /// Any fruit already on the board is removed first.
    pub fn create_fruit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Fruit, BoardError> {
        if let Some(old) = self.fruit {
            self.remove_object(&old);
        }

        let pos = fruit::pick_free_tile(self, rng).ok_or(BoardError::Full)?;
        let fruit = Fruit::new(pos);
        self.add_object(&fruit)?;
        self.fruit = Some(fruit);
        Ok(fruit)
    }

    /// The fruit currently on the board
    pub fn fruit(&self) -> Option<Fruit> {
        self.fruit
    }

    /// Remove the fruit if it sits at `pos`, leaving the tile empty.
    pub(crate) fn consume_fruit(&mut self, pos: Position) -> Option<Fruit> {
        match self.fruit {
            Some(fruit) if fruit.position() == pos => {
                self.fruit = None;
                self.set(pos, None);
                Some(fruit)
            }
            _ => None,
        }
    }

    pub(crate) fn occupy(&mut self, pos: Position, occupant: Occupant) {
        self.set(pos, Some(occupant));
    }

    pub(crate) fn vacate(&mut self, pos: Position) {
        self.set(pos, None);
    }

    fn set(&mut self, pos: Position, tile: Option<Occupant>) {
        if let Some(idx) = self.index(pos) {
            self.tiles[idx] = tile;
        }
    }

    /// All empty tiles, row-major
    pub fn free_tiles(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_none())
            .map(|(idx, _)| self.position_of(idx))
            .collect()
    }

    pub fn free_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_none()).count()
    }

    /// Count of tiles holding `occupant`
    pub fn count(&self, occupant: Occupant) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == Some(occupant))
            .count()
    }

    /// Read-only view of the grid, row-major
    pub fn tiles(&self) -> &[Option<Occupant>] {
        &self.tiles
    }

    /// Empty every tile and drop the fruit
    pub fn clear(&mut self) {
        self.tiles.fill(None);
        self.fruit = None;
    }
}
