//! Serpent Grid - a grid snake game with obstacles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, food, difficulty)
//! - `settings`: Engine configuration
//! - `highscores`: Best score and leaderboard
//! - `persistence`: JSON file storage for settings and scores

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::EngineSettings;
pub use sim::SimulationEngine;

/// Game configuration constants
pub mod consts {
    /// Grid side length in cells
    pub const TILE_COUNT: i32 = 20;
    /// Snake spawn cell
    pub const START_X: i32 = 10;
    pub const START_Y: i32 = 10;

    /// Tick interval at game start (ms)
    pub const INITIAL_TICK_MS: u32 = 150;
    /// Tick interval never drops below this (ms)
    pub const MIN_TICK_MS: u32 = 50;
    /// Interval reduction applied at every difficulty step (ms)
    pub const TICK_STEP_MS: u32 = 10;
    /// Difficulty rises every time the score is a multiple of this
    pub const SCORE_STEP: u32 = 5;

    /// Obstacles per spawned batch (inclusive)
    pub const OBSTACLE_COUNT_MIN: u32 = 3;
    pub const OBSTACLE_COUNT_MAX: u32 = 7;
    /// Segments per obstacle (inclusive)
    pub const OBSTACLE_LENGTH_MIN: u8 = 2;
    pub const OBSTACLE_LENGTH_MAX: u8 = 4;

    /// Random draws before food placement falls back to a free-cell scan
    pub const FOOD_ATTEMPTS: u32 = 64;
}
