//! Key mapping from terminal events to game input.

use crate::types::{Direction, GameInput};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a keyboard event to a game input.
///
/// Printable keys are passed through as [`GameInput::Char`]; the session
/// decides what they mean. Key releases and unmapped keys yield `None`.
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_interrupt(key) {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up => Some(GameInput::Turn(Direction::Up)),
        KeyCode::Down => Some(GameInput::Turn(Direction::Down)),
        KeyCode::Left => Some(GameInput::Turn(Direction::Left)),
        KeyCode::Right => Some(GameInput::Turn(Direction::Right)),

        KeyCode::Enter => Some(GameInput::Confirm),
        KeyCode::Backspace => Some(GameInput::Backspace),
        KeyCode::Esc => Some(GameInput::Quit),

        KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(GameInput::Char(ch))
        }

        _ => None,
    }
}

/// Ctrl+C, which raw mode delivers as a key event instead of a signal.
pub fn is_interrupt(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}
