//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameInput`]. Only key
//! presses and repeats are mapped, so terminals that report releases behave
//! the same as those that don't.

pub mod map;

pub use tui_snake_types as types;

pub use map::{is_interrupt, map_key_event};
