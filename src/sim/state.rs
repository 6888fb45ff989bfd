//! Game state and core simulation types
//!
//! Everything needed to continue a run deterministically lives here,
//! including the RNG stream.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::ObstacleSnapshot;
use super::spawn::{place_food, spawn_obstacles};
use crate::settings::EngineSettings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Freshly reset, no step taken yet
    Ready,
    /// At least one step taken, snake alive
    Running,
    /// Run ended; further steps and turns are no-ops
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the grid
    Wall,
    /// Head entered a snake segment
    SelfCollision,
    /// Head entered an obstacle cell
    Obstacle,
    /// No free cell left for food
    BoardFull,
}

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by moving `delta`, without wrapping
    #[inline]
    pub fn offset(self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Cell reached by moving `delta` on a toroidal grid
    #[inline]
    pub fn wrapped(self, delta: IVec2, tile_count: i32) -> Self {
        Self::new(
            (self.x + delta.x).rem_euclid(tile_count),
            (self.y + delta.y).rem_euclid(tile_count),
        )
    }

    #[inline]
    pub fn in_bounds(self, tile_count: i32) -> bool {
        (0..tile_count).contains(&self.x) && (0..tile_count).contains(&self.y)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Snake heading. Screen coordinates: `Up` decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for this heading
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when both headings move along the same axis
    pub fn same_axis(self, other: Direction) -> bool {
        self.is_horizontal() == other.is_horizontal()
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Map an input symbol ("up", "ArrowLeft", "d", ...) to a heading
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_lowercase().as_str() {
            "up" | "arrowup" | "w" => Some(Direction::Up),
            "down" | "arrowdown" | "s" => Some(Direction::Down),
            "left" | "arrowleft" | "a" => Some(Direction::Left),
            "right" | "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Axis along which an obstacle's segments extend from its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn delta(self) -> IVec2 {
        match self {
            Orientation::Horizontal => IVec2::X,
            Orientation::Vertical => IVec2::Y,
        }
    }
}

/// A straight barrier of `length` cells starting at `anchor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub anchor: Position,
    pub orientation: Orientation,
    pub length: u8,
    /// Per-tick displacement; `None` means stationary
    #[serde(default)]
    pub velocity: Option<IVec2>,
}

impl Obstacle {
    pub fn stationary(id: u32, anchor: Position, orientation: Orientation, length: u8) -> Self {
        Self {
            id,
            anchor,
            orientation,
            length: length.max(1),
            velocity: None,
        }
    }

    /// Occupied cells, anchor first, wrapped onto the grid
    pub fn cells(&self, tile_count: i32) -> impl Iterator<Item = Position> + '_ {
        let step = self.orientation.delta();
        (0..self.length.max(1) as i32).map(move |i| self.anchor.wrapped(step * i, tile_count))
    }

    pub fn occupies(&self, pos: Position, tile_count: i32) -> bool {
        self.cells(tile_count).any(|cell| cell == pos)
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.is_some_and(|v| v != IVec2::ZERO)
    }

    /// Move all segments together by one velocity step, wrapping at the edges
    pub fn advance(&mut self, tile_count: i32) {
        if let Some(velocity) = self.velocity {
            self.anchor = self.anchor.wrapped(velocity, tile_count);
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Grid side length
    pub tile_count: i32,
    /// Snake segments, head first
    pub snake: VecDeque<Position>,
    /// `None` only when the board has no free cell
    pub food: Option<Position>,
    /// Obstacles in spawn order (ascending id)
    pub obstacles: Vec<Obstacle>,
    /// Heading used by the last step
    pub heading: Direction,
    /// Accepted turn waiting for the next step
    pub pending_heading: Option<Direction>,
    /// Driver cadence in milliseconds
    pub tick_interval_ms: u32,
    pub score: u32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    /// Steps taken this run
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with its own RNG stream
    pub fn new(settings: &EngineSettings, seed: u64) -> Self {
        Self::with_rng(settings, seed, Pcg32::seed_from_u64(seed))
    }

    /// Create a fresh run continuing an existing RNG stream
    pub fn with_rng(settings: &EngineSettings, seed: u64, rng: Pcg32) -> Self {
        let mut snake = VecDeque::with_capacity(32);
        snake.push_back(settings.start);

        let mut state = Self {
            seed,
            tile_count: settings.tile_count,
            snake,
            food: None,
            obstacles: Vec::new(),
            heading: Direction::Right,
            pending_heading: None,
            tick_interval_ms: settings.initial_tick_ms,
            score: 0,
            phase: GamePhase::Ready,
            end_reason: None,
            time_ticks: 0,
            rng,
            next_id: 1,
        };

        // Obstacles first so the food draw can avoid them
        state.add_obstacle_batch(settings);
        state.respawn_food(settings);
        if state.food.is_none() {
            state.end(EndReason::BoardFull);
        }

        state
    }

    pub fn head(&self) -> Position {
        self.snake.front().copied().unwrap_or(Position::new(0, 0))
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Heading the next step will use
    pub fn effective_heading(&self) -> Direction {
        self.pending_heading.unwrap_or(self.heading)
    }

    /// Buffer a turn. Rejected when terminal or when it stays on the axis
    /// the snake last travelled along (covers reversals and repeats).
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_terminal() || direction.same_axis(self.heading) {
            return false;
        }
        self.pending_heading = Some(direction);
        true
    }

    /// Frozen view of every obstacle cell as it stands now
    pub fn obstacle_snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot::capture(&self.obstacles, self.tile_count)
    }

    /// Replace the food, avoiding snake and obstacle cells
    pub fn respawn_food(&mut self, settings: &EngineSettings) {
        let occupied = self.obstacle_snapshot();
        self.food = place_food(
            &mut self.rng,
            self.tile_count,
            &self.snake,
            &occupied,
            settings.food_attempts,
        );
        match self.food {
            Some(food) => log::debug!("Food placed at ({}, {})", food.x, food.y),
            None => log::info!("No free cell left for food"),
        }
    }

    /// Append a freshly generated batch of obstacles
    pub fn add_obstacle_batch(&mut self, settings: &EngineSettings) {
        let batch = spawn_obstacles(&mut self.rng, settings, self.next_id);
        self.next_id += batch.len() as u32;
        log::debug!(
            "Spawned {} obstacles ({} moving, {} total)",
            batch.len(),
            batch.iter().filter(|obstacle| obstacle.is_moving()).count(),
            self.obstacles.len() + batch.len()
        );
        self.obstacles.extend(batch);
    }

    pub fn advance_obstacles(&mut self) {
        let tile_count = self.tile_count;
        for obstacle in &mut self.obstacles {
            obstacle.advance(tile_count);
        }
    }

    /// Mark the run as over
    pub fn end(&mut self, reason: EndReason) {
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.pending_heading = None;
    }
}
