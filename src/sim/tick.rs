//! Discrete simulation tick
//!
//! Advances the game state by exactly one step. Order per tick:
//! 1. apply the buffered turn
//! 2. test the new head cell (wall, self, frozen obstacles)
//! 3. move the snake, eat or drop the tail
//! 4. on a difficulty step: faster cadence, more obstacles
//! 5. advance moving obstacles once

use serde::{Deserialize, Serialize};

use super::collision::check_collision;
use super::state::{EndReason, GamePhase, GameState};
use crate::settings::EngineSettings;

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Snake moved, nothing eaten
    Continue,
    /// Food eaten; `new_best` when the score beat the best known score
    Scored { score: u32, new_best: bool },
    /// This step ended the run
    Terminated { reason: EndReason },
    /// The run had already ended; nothing changed
    AlreadyTerminated,
}

/// Advance the game state by one tick
///
/// `best_score` is raised in place when the run beats it.
pub fn step(state: &mut GameState, settings: &EngineSettings, best_score: &mut u32) -> TickOutcome {
    if state.is_terminal() {
        return TickOutcome::AlreadyTerminated;
    }

    if let Some(heading) = state.pending_heading.take() {
        state.heading = heading;
    }
    state.phase = GamePhase::Running;
    state.time_ticks += 1;

    let new_head = state.head().offset(state.heading.delta());
    let frozen = state.obstacle_snapshot();

    if let Some(reason) = check_collision(new_head, &state.snake, &frozen, state.tile_count) {
        state.end(reason);
        log::info!(
            "Game over at tick {}: {:?} at ({}, {}), score {}",
            state.time_ticks,
            reason,
            new_head.x,
            new_head.y,
            state.score
        );
        return TickOutcome::Terminated { reason };
    }

    state.snake.push_front(new_head);

    let outcome = if state.food == Some(new_head) {
        state.score += 1;
        let new_best = state.score > *best_score;
        if new_best {
            *best_score = state.score;
        }

        state.respawn_food(settings);

        if state.score % settings.score_step == 0 {
            raise_difficulty(state, settings);
            // The new batch ignores the food; move the food if it got covered
            if state.food.is_some_and(|food| state.obstacle_snapshot().contains(food)) {
                state.respawn_food(settings);
            }
        }

        TickOutcome::Scored {
            score: state.score,
            new_best,
        }
    } else {
        state.snake.pop_back();
        TickOutcome::Continue
    };

    state.advance_obstacles();

    if state.food.is_none() {
        state.end(EndReason::BoardFull);
        log::info!("Board full at tick {}, score {}", state.time_ticks, state.score);
    }

    outcome
}

/// Tick interval after one difficulty step, floored at the minimum
pub fn next_tick_interval(current_ms: u32, settings: &EngineSettings) -> u32 {
    current_ms
        .saturating_sub(settings.tick_step_ms)
        .max(settings.min_tick_ms)
}

fn raise_difficulty(state: &mut GameState, settings: &EngineSettings) {
    let before = state.tick_interval_ms;
    state.tick_interval_ms = next_tick_interval(before, settings);
    state.add_obstacle_batch(settings);
    log::info!(
        "Score {}: tick interval {}ms -> {}ms, {} obstacles",
        state.score,
        before,
        state.tick_interval_ms,
        state.obstacles.len()
    );
}
