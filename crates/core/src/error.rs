//! Error types for the simulation core.
//!
//! Game over is not an error: it is reported as
//! [`MoveOutcome::Crashed`](crate::snake::MoveOutcome::Crashed). The errors
//! here are setup failures (bad configuration, impossible placements) and
//! score-file persistence failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Position;

/// Failure to place or spawn an object on the board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A target tile is outside the grid, already occupied, or listed twice by the object.
    #[error("cannot place object at {0}: tile is out of bounds, occupied or covered twice")]
    InvalidPlacement(Position),
    /// No unoccupied tile remains.
    #[error("no free tile left on the board")]
    Full,
}

/// A snake of the requested length cannot be built on the grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("snake length must be at least 1")]
    ZeroLength,
    #[error("snake of length {length} does not fit a {nb_lines}x{nb_cols} grid")]
    TooLong {
        length: usize,
        nb_lines: u16,
        nb_cols: u16,
    },
    #[error("snake segment {0} appears more than once")]
    Repeated(Position),
    #[error("snake segments {from} and {to} are not adjacent")]
    Disconnected { from: Position, to: Position },
}

/// Invalid or unreadable game configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("start length {length} leaves no room for fruit on a {width}x{height} grid")]
    NoRoomForFruit { length: usize, width: u16, height: u16 },
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Score file persistence failure.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("score file {path:?} could not be accessed")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {path:?} is not a valid score list")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session-level failure: surfaced to the caller as a configuration error.
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Board(#[from] BoardError),
}
