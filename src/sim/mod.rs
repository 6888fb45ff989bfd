//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per call, no timers
//! - Seeded RNG only
//! - Stable iteration order (obstacles by entity ID)
//! - No rendering, input-device or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod engine;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::choose_heading;
pub use collision::{ObstacleSnapshot, check_collision};
pub use engine::{SimulationEngine, Snapshot};
pub use spawn::{place_food, spawn_obstacles};
pub use state::{Direction, EndReason, GamePhase, GameState, Obstacle, Orientation, Position};
pub use tick::{TickOutcome, step};
