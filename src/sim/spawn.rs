//! Food placement and obstacle generation

use std::collections::VecDeque;

use rand::Rng;

use super::collision::ObstacleSnapshot;
use super::state::{Direction, Obstacle, Orientation, Position};
use crate::settings::EngineSettings;

/// Pick a food cell that is neither snake nor obstacle
///
/// Tries `attempts` uniform draws first. If they all land on occupied cells,
/// collects every free cell and picks one of those. Returns `None` only when
/// the board is full.
pub fn place_food<R: Rng>(
    rng: &mut R,
    tile_count: i32,
    snake: &VecDeque<Position>,
    obstacles: &ObstacleSnapshot,
    attempts: u32,
) -> Option<Position> {
    let occupied = |pos: Position| snake.contains(&pos) || obstacles.contains(pos);

    for _ in 0..attempts {
        let candidate = Position::new(
            rng.random_range(0..tile_count),
            rng.random_range(0..tile_count),
        );
        if !occupied(candidate) {
            return Some(candidate);
        }
    }

    // Row-major scan keeps the fallback deterministic for a given RNG state
    let free: Vec<Position> = (0..tile_count)
        .flat_map(|y| (0..tile_count).map(move |x| Position::new(x, y)))
        .filter(|&pos| !occupied(pos))
        .collect();

    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

/// Generate a batch of obstacles with ids starting at `first_id`
///
/// Anchors are uniform over the grid with no overlap check against the
/// snake, the food or other obstacles.
pub fn spawn_obstacles<R: Rng>(
    rng: &mut R,
    settings: &EngineSettings,
    first_id: u32,
) -> Vec<Obstacle> {
    let count = rng.random_range(settings.obstacle_count_min..=settings.obstacle_count_max);
    let tile_count = settings.tile_count;

    (0..count)
        .map(|i| {
            let anchor = Position::new(
                rng.random_range(0..tile_count),
                rng.random_range(0..tile_count),
            );
            let length =
                rng.random_range(settings.obstacle_length_min..=settings.obstacle_length_max);
            let orientation = if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };

            let mut obstacle = Obstacle::stationary(first_id + i, anchor, orientation, length);
            if settings.moving_obstacles {
                let heading = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                obstacle.velocity = Some(heading.delta());
            }
            obstacle
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_obstacles_ranges() {
        let settings = EngineSettings::default();
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..100 {
            let batch = spawn_obstacles(&mut rng, &settings, 10);
            assert!((3..=7).contains(&batch.len()));
            for (i, obstacle) in batch.iter().enumerate() {
                assert_eq!(obstacle.id, 10 + i as u32);
                assert!((2..=4).contains(&obstacle.length));
                assert!(obstacle.anchor.in_bounds(20));
                assert_eq!(obstacle.velocity, None);
            }
        }
    }

    #[test]
    fn test_spawn_moving_obstacles() {
        let settings = EngineSettings {
            moving_obstacles: true,
            ..EngineSettings::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let batch = spawn_obstacles(&mut rng, &settings, 1);

        for obstacle in &batch {
            let velocity = obstacle.velocity.expect("moving obstacle has a velocity");
            assert_eq!(velocity.x.abs() + velocity.y.abs(), 1);
        }
    }

    #[test]
    fn test_place_food_avoids_occupied_cells() {
        let mut rng = Pcg32::seed_from_u64(9);
        let snake: VecDeque<Position> = (0..4).map(|x| Position::new(x, 0)).collect();
        let obstacles = vec![Obstacle::stationary(
            1,
            Position::new(0, 1),
            Orientation::Horizontal,
            4,
        )];
        let snapshot = ObstacleSnapshot::capture(&obstacles, 4);

        for _ in 0..200 {
            let food = place_food(&mut rng, 4, &snake, &snapshot, 8).expect("free cells remain");
            assert!(!snake.contains(&food));
            assert!(!snapshot.contains(food));
            assert!(food.y >= 2);
        }
    }

    #[test]
    fn test_place_food_falls_back_to_scan() {
        // Only (3,3) is free; zero random attempts forces the scan path
        let mut rng = Pcg32::seed_from_u64(1);
        let snake: VecDeque<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .filter(|&p| p != Position::new(3, 3))
            .collect();

        let food = place_food(&mut rng, 4, &snake, &ObstacleSnapshot::default(), 0);
        assert_eq!(food, Some(Position::new(3, 3)));
    }

    #[test]
    fn test_place_food_full_board() {
        let mut rng = Pcg32::seed_from_u64(1);
        let snake: VecDeque<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .collect();

        assert_eq!(place_food(&mut rng, 4, &snake, &ObstacleSnapshot::default(), 16), None);
    }
}
