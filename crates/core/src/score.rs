//! Score module - named scores and the bounded high-score table
//!
//! A [`Score`] pairs a player name (at most [`MAX_NAME_LEN`] characters) with
//! the number of fruit eaten. Scores rank by value, highest first; the name
//! never takes part in ranking.
//!
//! The [`ScoreTable`] keeps at most `max_scores` entries in rank order and is
//! persisted as a JSON array of `{ "name": ..., "score": ... }` records:
//!
//! ```json
//! [
//!   { "name": "Joe", "score": 100 },
//!   { "name": "Jack", "score": 80 }
//! ]
//! ```

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::MAX_NAME_LEN;

/// Byte capacity for [`MAX_NAME_LEN`] characters of any width
const NAME_CAPACITY: usize = MAX_NAME_LEN * 4;

/// Fixed-capacity player name
pub type PlayerName = ArrayString<NAME_CAPACITY>;

/// Seed entries used when no score file exists yet
const BOOTSTRAP_SCORES: [(&str, u32); 4] = [
    ("Joe", 100),
    ("Jack", 80),
    ("Averell", 60),
    ("William", 40),
];

/// Truncate `name` to [`MAX_NAME_LEN`] characters
pub fn truncate_name(name: &str) -> PlayerName {
    let mut out = PlayerName::new();
    for ch in name.chars().take(MAX_NAME_LEN) {
        out.push(ch);
    }
    out
}

/// An immutable `(name, score)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ScoreRecord", into = "ScoreRecord")]
pub struct Score {
    name: PlayerName,
    score: u32,
}

impl Score {
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: truncate_name(name),
            score,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Same score under a new (truncated) name
    pub fn with_name(self, name: &str) -> Self {
        Self::new(name, self.score)
    }

    /// Rank order: higher scores first, names ignored
    pub fn cmp_rank(&self, other: &Score) -> Ordering {
        other.score.cmp(&self.score)
    }
}

/// On-disk shape of a score
#[derive(Serialize, Deserialize)]
struct ScoreRecord {
    name: String,
    score: u32,
}

impl From<ScoreRecord> for Score {
    fn from(record: ScoreRecord) -> Self {
        Score::new(&record.name, record.score)
    }
}

impl From<Score> for ScoreRecord {
    fn from(score: Score) -> Self {
        Self {
            name: score.name.to_string(),
            score: score.score,
        }
    }
}

/// Ranked, size-bounded collection of scores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    max_scores: usize,
    scores: Vec<Score>,
}

impl ScoreTable {
    /// Build a table from arbitrary scores: sorted by rank, cut to `max_scores`.
    ///
    /// Equal scores keep their input order.
    pub fn new(max_scores: usize, mut scores: Vec<Score>) -> Self {
        scores.sort_by(Score::cmp_rank);
        scores.truncate(max_scores);
        Self { max_scores, scores }
    }

    /// The bootstrap table used before any score file exists
    pub fn default_table(max_scores: usize) -> Self {
        let scores = BOOTSTRAP_SCORES
            .iter()
            .map(|&(name, score)| Score::new(name, score))
            .collect();
        Self::new(max_scores, scores)
    }

    pub fn max_scores(&self) -> usize {
        self.max_scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Score> {
        self.scores.iter()
    }

    pub fn as_slice(&self) -> &[Score] {
        &self.scores
    }

    /// Lowest-ranked entry
    pub fn lowest(&self) -> Option<&Score> {
        self.scores.last()
    }

    /// Whether `points` would earn a place in the table
    pub fn is_high_score(&self, points: u32) -> bool {
        if self.max_scores == 0 {
            return false;
        }
        if self.scores.len() < self.max_scores {
            return true;
        }
        self.lowest().map_or(true, |lowest| points > lowest.score())
    }

    /// Insert `score` if it qualifies. Returns whether it was inserted.
    ///
    /// A new entry ranks after existing entries with the same value.
    pub fn add_score(&mut self, score: Score) -> bool {
        if !self.is_high_score(score.score()) {
            return false;
        }
        self.scores.push(score);
        self.scores.sort_by(Score::cmp_rank);
        self.scores.truncate(self.max_scores);
        true
    }

    /// Write the table as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let io_err = |source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.scores).map_err(|source| {
            ScoreError::Format {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Read a table from JSON. A missing file yields [`ScoreTable::default_table`].
    pub fn load(path: &Path, max_scores: usize) -> Result<Self, ScoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no score file at {:?}, starting from defaults", path);
                return Ok(Self::default_table(max_scores));
            }
            Err(source) => {
                return Err(ScoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let scores: Vec<Score> =
            serde_json::from_str(&text).map_err(|source| ScoreError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(max_scores, scores))
    }

    /// Like [`ScoreTable::load`], falling back to defaults on any error
    pub fn load_or_default(path: &Path, max_scores: usize) -> Self {
        match Self::load(path, max_scores) {
            Ok(table) => table,
            Err(err) => {
                log::warn!("{err}: {err:?}; using default scores");
                Self::default_table(max_scores)
            }
        }
    }
}

impl<'a> IntoIterator for &'a ScoreTable {
    type Item = &'a Score;
    type IntoIter = std::slice::Iter<'a, Score>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}
