//! Simulation engine facade
//!
//! Owns the game state exclusively. Drivers call [`SimulationEngine::step`]
//! on their own cadence, forward turns through
//! [`SimulationEngine::set_direction`], and read [`Snapshot`]s to render.
//! The engine never blocks, sleeps or performs I/O.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Direction, EndReason, GamePhase, GameState, Position};
use super::tick::{self, TickOutcome};
use crate::settings::{EngineSettings, SettingsError};

/// Read-only view of a run for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tile_count: i32,
    /// Head first
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    /// Every obstacle cell, in obstacle order
    pub obstacle_cells: Vec<Position>,
    pub score: u32,
    pub best_score: u32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    pub tick_interval_ms: u32,
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

/// The single owner of a snake run
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    settings: EngineSettings,
    state: GameState,
    best_score: u32,
}

impl SimulationEngine {
    /// Validate `settings` and start a run seeded with `seed`
    pub fn new(settings: EngineSettings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let state = GameState::new(&settings, seed);
        log::info!(
            "Engine ready: {}x{} grid, seed {}, preset {}",
            settings.tile_count,
            settings.tile_count,
            seed,
            settings.preset.as_str()
        );
        Ok(Self {
            settings,
            state,
            best_score: 0,
        })
    }

    /// Seed the best score from persisted data
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = best_score;
        self
    }

    /// Discard the current run and start a new one on the same RNG stream
    pub fn reset(&mut self) -> Snapshot {
        let rng: Pcg32 = self.state.rng.clone();
        self.state = GameState::with_rng(&self.settings, self.state.seed, rng);
        log::info!("Game reset ({} obstacles)", self.state.obstacles.len());
        self.snapshot()
    }

    /// Discard the current run and start a new one with a fresh seed
    pub fn reset_with_seed(&mut self, seed: u64) -> Snapshot {
        self.state = GameState::new(&self.settings, seed);
        log::info!("Game reset with seed {seed}");
        self.snapshot()
    }

    /// Buffer a turn for the next step; false when rejected
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.state.set_direction(direction)
    }

    /// Buffer a turn from an input symbol; unknown symbols are ignored
    pub fn set_direction_input(&mut self, symbol: &str) -> bool {
        match Direction::from_symbol(symbol) {
            Some(direction) => self.set_direction(direction),
            None => {
                log::debug!("Ignoring unknown direction input {symbol:?}");
                false
            }
        }
    }

    /// Advance one tick
    pub fn step(&mut self) -> TickOutcome {
        tick::step(&mut self.state, &self.settings, &mut self.best_score)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Cadence the driver should use for the next step
    pub fn tick_interval_ms(&self) -> u32 {
        self.state.tick_interval_ms
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            tile_count: state.tile_count,
            snake: state.snake.iter().copied().collect(),
            food: state.food,
            obstacle_cells: state
                .obstacles
                .iter()
                .flat_map(|obstacle| obstacle.cells(state.tile_count))
                .collect(),
            score: state.score,
            best_score: self.best_score,
            phase: state.phase,
            end_reason: state.end_reason,
            tick_interval_ms: state.tick_interval_ms,
            time_ticks: state.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> SimulationEngine {
        SimulationEngine::new(EngineSettings::default(), seed).unwrap()
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = EngineSettings {
            tile_count: 2,
            ..EngineSettings::default()
        };
        assert!(SimulationEngine::new(settings, 1).is_err());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let engine = engine(4).with_best_score(17);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.snake, vec![Position::new(10, 10)]);
        assert_eq!(snapshot.best_score, 17);
        assert_eq!(snapshot.tick_interval_ms, 150);
        assert_eq!(snapshot.phase, GamePhase::Ready);
        let expected_cells: usize = engine
            .state()
            .obstacles
            .iter()
            .map(|o| o.length as usize)
            .sum();
        assert_eq!(snapshot.obstacle_cells.len(), expected_cells);
        assert!(!snapshot.is_terminal());
    }

    #[test]
    fn test_runs_into_wall_and_stays_terminated() {
        let mut engine = engine(8);
        // Heading right from (10,10) the wall is at most 10 steps away
        let mut outcome = TickOutcome::Continue;
        for _ in 0..20 {
            outcome = engine.step();
            if engine.is_terminal() {
                break;
            }
        }
        assert!(matches!(outcome, TickOutcome::Terminated { .. }));
        assert_eq!(engine.step(), TickOutcome::AlreadyTerminated);
        assert!(!engine.set_direction(Direction::Up));
    }

    #[test]
    fn test_unknown_input_ignored() {
        let mut engine = engine(1);
        assert!(!engine.set_direction_input("jump"));
        assert_eq!(engine.state().pending_heading, None);
        assert!(engine.set_direction_input("ArrowDown"));
        assert_eq!(engine.state().pending_heading, Some(Direction::Down));
    }

    #[test]
    fn test_reset_starts_fresh_and_keeps_best() {
        let mut engine = engine(21).with_best_score(5);
        engine.set_direction(Direction::Up);
        engine.step();

        let snapshot = engine.reset();
        assert_eq!(snapshot.snake, vec![Position::new(10, 10)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.time_ticks, 0);
        assert_eq!(snapshot.phase, GamePhase::Ready);
        assert_eq!(snapshot.best_score, 5);
        assert_eq!(engine.state().heading, Direction::Right);
    }

    #[test]
    fn test_reset_with_same_seed_reproduces_layout() {
        let mut a = engine(1);
        let b = engine(2);
        a.reset_with_seed(2);
        assert_eq!(a.state().obstacles, b.state().obstacles);
        assert_eq!(a.state().food, b.state().food);
    }
}
