//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no I/O, making them usable from the
//! simulation core, the input mapping and the terminal renderer alike.
//!
//! # Grid Coordinates
//!
//! Positions are `(row, col)` pairs:
//!
//! - **row**: `0..nb_lines`, top to bottom
//! - **col**: `0..nb_cols`, left to right
//!
//! Coordinates are signed so a step off the grid can be represented before it
//! is rejected or wrapped.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 20 | Grid columns |
//! | `DEFAULT_HEIGHT` | 15 | Grid lines |
//! | `DEFAULT_TILE_SIZE` | 2 | Terminal columns per tile |
//! | `DEFAULT_FPS` | 8 | Simulation ticks per second |
//! | `SNAKE_START_LENGTH` | 3 | Segments of a fresh snake |
//! | `DEFAULT_MAX_SCORES` | 5 | Entries kept in the score table |
//! | `MAX_NAME_LEN` | 8 | Characters kept in a player name |
//!
//! # Examples
//!
//! ```
//! use tui_snake_types::{Direction, Position, Rgb};
//!
//! let head = Position::new(2, 3);
//! assert_eq!(head.step(Direction::Right), Position::new(2, 4));
//! assert!(Direction::Up.is_opposite(Direction::Down));
//!
//! let red: Rgb = "#ff0000".parse().unwrap();
//! assert_eq!(red, Rgb::new(255, 0, 0));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default grid width in tiles
pub const DEFAULT_WIDTH: u16 = 20;

/// Default grid height in tiles
pub const DEFAULT_HEIGHT: u16 = 15;

/// Default tile width in terminal columns (2 compensates for glyph aspect ratio)
pub const DEFAULT_TILE_SIZE: u16 = 2;

/// Default simulation rate in ticks per second
pub const DEFAULT_FPS: u32 = 8;

/// Length of a freshly spawned snake
pub const SNAKE_START_LENGTH: usize = 3;

/// Default number of entries in the high-score table
pub const DEFAULT_MAX_SCORES: usize = 5;

/// Maximum number of characters kept in a player name
pub const MAX_NAME_LEN: usize = 8;

/// A tile coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offset by a raw `(d_row, d_col)` delta
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// The neighbouring tile in `dir` (may be off the grid)
    pub fn step(self, dir: Direction) -> Self {
        let (d_row, d_col) = dir.offset();
        self.offset(d_row, d_col)
    }

    /// Wrap both coordinates into `[0, nb_lines) x [0, nb_cols)`
    pub fn wrapped(self, nb_lines: u16, nb_cols: u16) -> Self {
        Self {
            row: self.row.rem_euclid(nb_lines as i32),
            col: self.col.rem_euclid(nb_cols as i32),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(d_row, d_col)` for one step in this direction
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if turning from `self` to `other` would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// The finite set of screens the game moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// High-score table, waiting for the player to start
    #[default]
    Scores,
    /// A run is in progress
    Play,
    /// The run has ended; a countdown runs before the result is resolved
    GameOver,
    /// The player is typing a name for a new high score
    InputName,
    /// Terminal state, the loop stops after the current frame
    Quit,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Scores => "scores",
            GameState::Play => "play",
            GameState::GameOver => "game_over",
            GameState::InputName => "input_name",
            GameState::Quit => "quit",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input events delivered by the presentation layer
///
/// Printable keys (including space and `q`) arrive as [`GameInput::Char`];
/// their meaning depends on the current [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameInput {
    /// Arrow key
    Turn(Direction),
    /// Enter
    Confirm,
    /// A printable character
    Char(char),
    /// Delete the last typed character
    Backspace,
    /// Quit signal (Ctrl+C, Esc, terminal closed)
    Quit,
}

/// 24-bit RGB color.
///
/// Parsed from and serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Error returned when a color string is not `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRgbError(String);

impl fmt::Display for ParseRgbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #rrggbb", self.0)
    }
}

impl std::error::Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseRgbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}
