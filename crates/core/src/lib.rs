//! Core game logic - deterministic and testable
//!
//! This crate holds every rule of the game and none of its presentation. It
//! never touches the terminal; the only I/O is reading the optional TOML
//! configuration and the JSON score file.
//!
//! - **Deterministic**: all randomness comes from an injected `StdRng`, so a
//!   seed replays the same game
//! - **Testable**: the state machine is driven by plain [`GameInput`] values and
//!   observed through [`GameSnapshot`]
//!
//! # Module Structure
//!
//! - [`board`]: the tile grid and the single fruit slot
//! - [`fruit`]: fruit placement on a random free tile
//! - [`snake`]: body, heading and the per-tick movement rule
//! - [`score`]: named scores and the persisted high-score table
//! - [`config`]: session configuration (defaults, TOML, validation)
//! - [`session`]: the Scores / Play / GameOver / InputName / Quit state machine
//! - [`snapshot`]: the read-only view handed to the renderer
//! - [`error`]: typed errors
//!
//! # Game Rules
//!
//! | Rule | Behavior |
//! |------|----------|
//! | Movement | one tile per tick in the current heading |
//! | Turning | reversing into the neck is ignored while longer than one segment |
//! | Eating | the head entering the fruit tile grows the snake by one and scores one point |
//! | Walls | crash when `gameover_on_exit`, otherwise wrap to the opposite edge |
//! | Self | entering any body tile crashes, except the tail tile that moves away this tick |
//! | Full grid | a snake that fills every tile ends the run |
//!
//! # Example
//!
//! ```
//! use tui_snake_core::{GameConfig, Session};
//! use tui_snake_types::{GameInput, GameState};
//!
//! let mut config = GameConfig::small();
//! config.fps = 2;
//! let mut session = Session::from_config(config, 7).unwrap();
//!
//! session.handle_input(GameInput::Char(' '));
//! assert_eq!(session.state(), GameState::Play);
//!
//! session.tick().unwrap();
//! assert_eq!(session.snapshot().tick, 1);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod fruit;
pub mod score;
pub mod session;
pub mod snake;
pub mod snapshot;

pub use tui_snake_types as types;

pub use board::{Board, BoardObject, Occupant};
pub use config::GameConfig;
pub use error::{BoardError, ConfigError, GameError, PlacementError, ScoreError};
pub use fruit::Fruit;
pub use score::{PlayerName, Score, ScoreTable};
pub use session::Session;
pub use snake::{Collision, MoveOutcome, Snake};
pub use snapshot::GameSnapshot;
pub use types::{Direction, GameInput, GameState, Position, Rgb};
