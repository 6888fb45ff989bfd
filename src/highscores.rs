//! Best score and high score leaderboard
//!
//! Persisted through [`Storage`], tracks the best score and the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, Storage};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Food eaten
    pub score: u32,
    /// Snake length at the end of the run
    pub length: u32,
    /// Ticks survived
    pub ticks: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Highest score ever reached, even mid-run
    #[serde(default)]
    pub best: u32,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "serpent_grid_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the best score; returns true when `score` beat it
    pub fn record_best(&mut self, score: u32) -> bool {
        if self.is_new_best(score) {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// True when `score` would raise the stored best
    pub fn is_new_best(&self, score: u32) -> bool {
        score > self.best
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(
        &mut self,
        score: u32,
        length: u32,
        ticks: u64,
        timestamp_ms: u64,
    ) -> Option<usize> {
        self.record_best(score);
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            length,
            ticks,
            timestamp_ms,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top leaderboard score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh when missing or unreadable
    pub fn load(storage: &Storage) -> Self {
        match storage.load::<HighScores>(Self::STORAGE_KEY) {
            Ok(Some(mut scores)) => {
                // Older files may carry entries but no best
                let top = scores.top_score().unwrap_or(0);
                scores.record_best(top);
                log::info!(
                    "Loaded {} high scores, best {}",
                    scores.entries.len(),
                    scores.best
                );
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores ({e}), starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &Storage) -> Result<(), PersistenceError> {
        storage.save(Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
