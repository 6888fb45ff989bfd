//! Collision detection for the snake head
//!
//! Collisions are tested before anything moves: the candidate head cell is
//! compared against the grid bounds, the snake as it stood at tick start, and
//! a frozen snapshot of obstacle cells. Obstacles advance only afterwards.

use std::collections::{HashSet, VecDeque};

use super::state::{EndReason, Obstacle, Position};

/// Every obstacle cell at one instant
#[derive(Debug, Clone, Default)]
pub struct ObstacleSnapshot {
    cells: HashSet<Position>,
}

impl ObstacleSnapshot {
    pub fn capture(obstacles: &[Obstacle], tile_count: i32) -> Self {
        let cells = obstacles
            .iter()
            .flat_map(|obstacle| obstacle.cells(tile_count))
            .collect();
        Self { cells }
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Check whether moving the head to `new_head` ends the run
///
/// First match wins: wall, then self, then obstacle. The self test covers
/// every current segment, the tail included, even though the tail would
/// be vacated on a non-growing tick.
pub fn check_collision(
    new_head: Position,
    snake: &VecDeque<Position>,
    obstacles: &ObstacleSnapshot,
    tile_count: i32,
) -> Option<EndReason> {
    if !new_head.in_bounds(tile_count) {
        return Some(EndReason::Wall);
    }

    if snake.contains(&new_head) {
        return Some(EndReason::SelfCollision);
    }

    if obstacles.contains(new_head) {
        return Some(EndReason::Obstacle);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Orientation;

    fn snake_of(cells: &[(i32, i32)]) -> VecDeque<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_free_cell() {
        let snake = snake_of(&[(10, 10)]);
        let obstacles = ObstacleSnapshot::default();
        assert_eq!(check_collision(Position::new(11, 10), &snake, &obstacles, 20), None);
    }

    #[test]
    fn test_wall_collision() {
        let snake = snake_of(&[(19, 4)]);
        let obstacles = ObstacleSnapshot::default();
        assert_eq!(
            check_collision(Position::new(20, 4), &snake, &obstacles, 20),
            Some(EndReason::Wall)
        );
        assert_eq!(
            check_collision(Position::new(3, -1), &snake, &obstacles, 20),
            Some(EndReason::Wall)
        );
    }

    #[test]
    fn test_tail_cell_is_fatal() {
        // Square loop: head at (5,5), tail at (5,6), heading down into the tail
        let snake = snake_of(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        let obstacles = ObstacleSnapshot::default();
        assert_eq!(
            check_collision(Position::new(5, 6), &snake, &obstacles, 20),
            Some(EndReason::SelfCollision)
        );
    }

    #[test]
    fn test_obstacle_collision_uses_every_segment() {
        let obstacles = vec![Obstacle::stationary(
            1,
            Position::new(8, 2),
            Orientation::Vertical,
            3,
        )];
        let snapshot = ObstacleSnapshot::capture(&obstacles, 20);
        let snake = snake_of(&[(7, 4)]);

        for y in 2..5 {
            assert!(snapshot.contains(Position::new(8, y)));
        }
        assert!(!snapshot.contains(Position::new(8, 1)));
        assert_eq!(
            check_collision(Position::new(8, 4), &snake, &snapshot, 20),
            Some(EndReason::Obstacle)
        );
        assert_eq!(check_collision(Position::new(8, 5), &snake, &snapshot, 20), None);
    }

    #[test]
    fn test_wall_takes_precedence() {
        // An obstacle wrapped onto column 0 does not matter when the head leaves the grid
        let obstacles = vec![Obstacle::stationary(
            1,
            Position::new(19, 0),
            Orientation::Horizontal,
            2,
        )];
        let snapshot = ObstacleSnapshot::capture(&obstacles, 20);
        let snake = snake_of(&[(0, 0)]);
        assert_eq!(
            check_collision(Position::new(-1, 0), &snake, &snapshot, 20),
            Some(EndReason::Wall)
        );
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut obstacles = vec![Obstacle::stationary(
            1,
            Position::new(3, 3),
            Orientation::Horizontal,
            1,
        )];
        obstacles[0].velocity = Some(glam::IVec2::X);
        let snapshot = ObstacleSnapshot::capture(&obstacles, 20);

        obstacles[0].advance(20);
        assert!(snapshot.contains(Position::new(3, 3)));
        assert!(!snapshot.contains(Position::new(4, 3)));
    }
}
