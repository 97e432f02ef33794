//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the view draws a
//! [`GameSnapshot`](crate::core::GameSnapshot) into a plain framebuffer, and
//! the renderer flushes that framebuffer to the terminal with `crossterm`.
//!
//! - `core` stays free of terminal concerns
//! - tiles can be wider than one column to square up the board

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_snake_core as core;
pub use tui_snake_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Palette, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
