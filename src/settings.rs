//! Engine settings and difficulty presets
//!
//! Persisted as JSON next to the high scores.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{PersistenceError, Storage};
use crate::sim::Position;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Relaxed,
    #[default]
    Classic,
    Frantic,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Relaxed => "Relaxed",
            DifficultyPreset::Classic => "Classic",
            DifficultyPreset::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(DifficultyPreset::Relaxed),
            "classic" | "normal" => Some(DifficultyPreset::Classic),
            "frantic" | "hard" => Some(DifficultyPreset::Frantic),
            _ => None,
        }
    }

    /// Starting tick interval (ms)
    pub fn initial_tick_ms(&self) -> u32 {
        match self {
            DifficultyPreset::Relaxed => 200,
            DifficultyPreset::Classic => INITIAL_TICK_MS,
            DifficultyPreset::Frantic => 120,
        }
    }

    /// Whether freshly spawned obstacles drift across the grid
    pub fn moving_obstacles(&self) -> bool {
        matches!(self, DifficultyPreset::Frantic)
    }
}

/// Invalid settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("tile count {0} is below the minimum of 4")]
    GridTooSmall(i32),

    #[error("start cell ({x}, {y}) lies outside a {tile_count}x{tile_count} grid")]
    StartOutOfBounds { x: i32, y: i32, tile_count: i32 },

    #[error("minimum tick interval {min}ms exceeds the initial interval {initial}ms")]
    IntervalFloorAboveStart { min: u32, initial: u32 },

    #[error("minimum tick interval must be at least 1ms")]
    ZeroIntervalFloor,

    #[error("score step must be at least 1")]
    ZeroScoreStep,

    #[error("{what} range {min}..={max} is empty or invalid")]
    BadRange { what: &'static str, min: u32, max: u32 },
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Difficulty preset the values below were derived from
    pub preset: DifficultyPreset,

    // === Grid ===
    /// Grid side length in cells
    pub tile_count: i32,
    /// Snake spawn cell
    pub start: Position,

    // === Cadence ===
    pub initial_tick_ms: u32,
    pub min_tick_ms: u32,
    /// Interval reduction per difficulty step
    pub tick_step_ms: u32,
    /// A difficulty step happens whenever the score is a multiple of this
    pub score_step: u32,

    // === Obstacles ===
    pub obstacle_count_min: u32,
    pub obstacle_count_max: u32,
    pub obstacle_length_min: u8,
    pub obstacle_length_max: u8,
    /// Give spawned obstacles a random unit velocity
    pub moving_obstacles: bool,

    // === Food ===
    /// Random draws before scanning for a free cell
    pub food_attempts: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            preset: DifficultyPreset::Classic,

            tile_count: TILE_COUNT,
            start: Position::new(START_X, START_Y),

            initial_tick_ms: INITIAL_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            tick_step_ms: TICK_STEP_MS,
            score_step: SCORE_STEP,

            obstacle_count_min: OBSTACLE_COUNT_MIN,
            obstacle_count_max: OBSTACLE_COUNT_MAX,
            obstacle_length_min: OBSTACLE_LENGTH_MIN,
            obstacle_length_max: OBSTACLE_LENGTH_MAX,
            moving_obstacles: false,

            food_attempts: FOOD_ATTEMPTS,
        }
    }
}

impl EngineSettings {
    /// Storage key
    const STORAGE_KEY: &'static str = "serpent_grid_settings";

    /// Create settings from a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates preset-dependent settings)
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.preset = preset;
        self.initial_tick_ms = preset.initial_tick_ms();
        self.moving_obstacles = preset.moving_obstacles();
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tile_count < 4 {
            return Err(SettingsError::GridTooSmall(self.tile_count));
        }
        if !self.start.in_bounds(self.tile_count) {
            return Err(SettingsError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
                tile_count: self.tile_count,
            });
        }
        if self.min_tick_ms == 0 {
            return Err(SettingsError::ZeroIntervalFloor);
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err(SettingsError::IntervalFloorAboveStart {
                min: self.min_tick_ms,
                initial: self.initial_tick_ms,
            });
        }
        if self.score_step == 0 {
            return Err(SettingsError::ZeroScoreStep);
        }
        if self.obstacle_count_min > self.obstacle_count_max {
            return Err(SettingsError::BadRange {
                what: "obstacle count",
                min: self.obstacle_count_min,
                max: self.obstacle_count_max,
            });
        }
        let max_length = u32::from(self.obstacle_length_max);
        if self.obstacle_length_min == 0
            || self.obstacle_length_min > self.obstacle_length_max
            || max_length > self.tile_count as u32
        {
            return Err(SettingsError::BadRange {
                what: "obstacle length",
                min: u32::from(self.obstacle_length_min),
                max: max_length,
            });
        }
        Ok(())
    }

    /// Load settings, falling back to defaults when missing or invalid
    pub fn load(storage: &Storage) -> Self {
        match storage.load::<Self>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings ({})", settings.preset.as_str());
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings rejected: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &Storage) -> Result<(), PersistenceError> {
        storage.save(Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
