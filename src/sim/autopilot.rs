//! Demo/attract-mode controller
//!
//! Picks a heading for the next step from the current state. Only looks one
//! cell ahead (plus how many exits that cell has), which is enough to keep
//! a demo run going for a while but not to play well.

use super::collision::{ObstacleSnapshot, check_collision};
use super::state::{Direction, GameState, Position};

/// Heading the autopilot wants for the next step
///
/// Candidates are the current heading and the two perpendicular turns.
/// Fatal cells are skipped; among safe ones the closest to the food wins,
/// with dead ends ranked last. If everything is fatal the heading is kept.
pub fn choose_heading(state: &GameState) -> Direction {
    let obstacles = state.obstacle_snapshot();
    let head = state.head();
    let current = state.heading;

    let candidates = Direction::ALL
        .into_iter()
        .filter(|&dir| dir != current.opposite());

    candidates
        .filter_map(|dir| {
            let next = head.offset(dir.delta());
            if check_collision(next, &state.snake, &obstacles, state.tile_count).is_some() {
                return None;
            }
            let dead_end = exits(state, &obstacles, next, head) == 0;
            let distance = state.food.map(|food| next.manhattan(food)).unwrap_or(0);
            Some(((dead_end, distance, dir != current), dir))
        })
        .min_by_key(|&(rank, _)| rank)
        .map(|(_, dir)| dir)
        .unwrap_or(current)
}

/// Free neighbours of `cell`, counting `vacated` as taken
fn exits(
    state: &GameState,
    obstacles: &ObstacleSnapshot,
    cell: Position,
    vacated: Position,
) -> usize {
    Direction::ALL
        .into_iter()
        .map(|dir| cell.offset(dir.delta()))
        .filter(|&next| next != vacated)
        .filter(|&next| check_collision(next, &state.snake, obstacles, state.tile_count).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::settings::EngineSettings;
    use crate::sim::state::{Obstacle, Orientation};
    use crate::sim::tick::{TickOutcome, step};

    fn open_state() -> GameState {
        let mut state = GameState::new(&EngineSettings::default(), 3);
        state.obstacles.clear();
        state
    }

    #[test]
    fn test_heads_toward_food() {
        let mut state = open_state();
        state.food = Some(Position::new(10, 2));
        assert_eq!(choose_heading(&state), Direction::Up);

        state.food = Some(Position::new(15, 10));
        assert_eq!(choose_heading(&state), Direction::Right);
    }

    #[test]
    fn test_never_reverses() {
        let mut state = open_state();
        state.food = Some(Position::new(2, 10));
        // Food straight behind: must turn rather than reverse
        assert_ne!(choose_heading(&state), Direction::Left);
    }

    #[test]
    fn test_avoids_obstacle_ahead() {
        let mut state = open_state();
        state.food = Some(Position::new(15, 10));
        state
            .obstacles
            .push(Obstacle::stationary(1, Position::new(11, 10), Orientation::Vertical, 1));

        let heading = choose_heading(&state);
        assert!(matches!(heading, Direction::Up | Direction::Down));
    }

    #[test]
    fn test_avoids_wall() {
        let mut state = open_state();
        state.snake = VecDeque::from([Position::new(19, 0)]);
        state.food = Some(Position::new(19, 19));
        assert_eq!(choose_heading(&state), Direction::Down);
    }

    #[test]
    fn test_demo_run_survives_opening() {
        let settings = EngineSettings::default();
        let mut state = open_state();
        let mut best = 0;

        for _ in 0..30 {
            let heading = choose_heading(&state);
            if heading != state.heading {
                state.set_direction(heading);
            }
            let outcome = step(&mut state, &settings, &mut best);
            assert!(!matches!(outcome, TickOutcome::Terminated { .. }), "{outcome:?}");
        }
    }
}
