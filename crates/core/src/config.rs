use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    Rgb, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_MAX_SCORES, DEFAULT_TILE_SIZE, DEFAULT_WIDTH,
    SNAKE_START_LENGTH,
};

/// Default location of the persisted score table
pub const DEFAULT_SCORES_FILE: &str = "tui-snake-scores.json";

/// Session configuration, consumed once when the session starts.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// width = 30
/// gameover_on_exit = false
/// fruit_color = "#ff4040"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width in tiles
    pub width: u16,
    /// Grid height in tiles
    pub height: u16,
    /// Tile width in terminal columns
    pub tile_size: u16,
    /// Simulation ticks per second
    pub fps: u32,
    pub fruit_color: Rgb,
    pub snake_head_color: Rgb,
    pub snake_body_color: Rgb,
    /// End the run when the head leaves the grid; otherwise wrap around
    pub gameover_on_exit: bool,
    pub start_length: usize,
    pub max_scores: usize,
    /// Where the score table is persisted; `None` keeps it in memory only
    pub scores_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            fps: DEFAULT_FPS,
            fruit_color: Rgb::new(220, 50, 50),
            snake_head_color: Rgb::new(240, 220, 80),
            snake_body_color: Rgb::new(60, 180, 80),
            gameover_on_exit: true,
            start_length: SNAKE_START_LENGTH,
            max_scores: DEFAULT_MAX_SCORES,
            scores_file: Some(PathBuf::from(DEFAULT_SCORES_FILE)),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Small in-memory configuration for tests and benches
    pub fn small() -> Self {
        Self {
            scores_file: None,
            ..Self::new(10, 10)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("width", self.width as usize),
            ("height", self.height as usize),
            ("tile_size", self.tile_size as usize),
            ("fps", self.fps as usize),
            ("start_length", self.start_length),
            ("max_scores", self.max_scores),
        ];
        if let Some(&(field, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero { field });
        }

        // One tile must stay free for the fruit.
        if self.start_length >= self.width as usize * self.height as usize {
            return Err(ConfigError::NoRoomForFruit {
                length: self.start_length,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Wall-clock length of one tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Ticks the game-over screen stays up (about one second)
    pub fn countdown_ticks(&self) -> u32 {
        self.fps.max(1)
    }
}
