//! Read-only view of a session for the renderer.
//!
//! `Session::snapshot_into` refills an existing snapshot so a renderer can keep
//! one around and reuse its allocations every frame.

use crate::score::Score;
use crate::types::{Direction, GameState, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub state: GameState,
    pub nb_lines: u16,
    pub nb_cols: u16,
    /// Snake segments, head first
    pub snake: Vec<Position>,
    pub heading: Direction,
    pub fruit: Option<Position>,
    /// Points of the current run
    pub points: u32,
    /// Ranked score table
    pub scores: Vec<Score>,
    /// Score being named while in `InputName`
    pub name_entry: Option<Score>,
    /// Ticks left on the game-over screen
    pub countdown: u32,
    pub tick: u64,
    /// The last attempt to persist the score table failed
    pub save_failed: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.state = GameState::Scores;
        self.nb_lines = 0;
        self.nb_cols = 0;
        self.snake.clear();
        self.heading = Direction::Right;
        self.fruit = None;
        self.points = 0;
        self.scores.clear();
        self.name_entry = None;
        self.countdown = 0;
        self.tick = 0;
        self.save_failed = false;
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Play
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            state: GameState::Scores,
            nb_lines: 0,
            nb_cols: 0,
            snake: Vec::new(),
            heading: Direction::Right,
            fruit: None,
            points: 0,
            scores: Vec::new(),
            name_entry: None,
            countdown: 0,
            tick: 0,
            save_failed: false,
        }
    }
}
