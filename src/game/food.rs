//! Food placement.
//!
//! Food goes on an interior cell (the outer ring is always wall) that is free
//! of both snake and walls. Placement samples uniformly at random and falls
//! back to enumerating the free cells when the board is crowded, so it always
//! terminates.

use rand::Rng;

use super::state::Position;
use super::walls::WallSet;

/// Below this share of free interior cells, enumerate instead of sampling
const CROWDED_FREE_RATIO: f64 = 0.25;

/// Rejected samples tolerated before enumerating anyway
const MAX_SAMPLES: usize = 1024;

/// Pick a free interior cell, or `None` when the interior is completely full.
pub fn place_food<R: Rng>(
    rng: &mut R,
    cols: u32,
    rows: u32,
    snake: &[Position],
    walls: &WallSet,
) -> Option<Position> {
    let (cols, rows) = (cols as i32, rows as i32);
    if cols < 3 || rows < 3 {
        return None;
    }

    let is_free = |pos: &Position| !walls.contains(pos) && !snake.contains(pos);

    let interior = ((cols - 2) * (rows - 2)) as usize;
    let occupied = interior_cells(cols, rows).filter(|p| !is_free(p)).count();
    let free = interior - occupied;
    if free == 0 {
        return None;
    }

    if (free as f64) / (interior as f64) >= CROWDED_FREE_RATIO {
        for _ in 0..MAX_SAMPLES {
            let candidate = Position::new(rng.gen_range(1..=cols - 2), rng.gen_range(1..=rows - 2));
            if is_free(&candidate) {
                return Some(candidate);
            }
        }
    }

    let pick = rng.gen_range(0..free);
    interior_cells(cols, rows).filter(is_free).nth(pick)
}

fn interior_cells(cols: i32, rows: i32) -> impl Iterator<Item = Position> {
    (1..rows - 1).flat_map(move |y| (1..cols - 1).map(move |x| Position::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::walls::walls;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_food_avoids_snake_and_walls() {
        let mut rng = Pcg32::seed_from_u64(42);
        let snake = vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        for level in 1..=8 {
            let w = walls(level, 32, 24);
            for _ in 0..200 {
                let food = place_food(&mut rng, 32, 24, &snake, &w).unwrap();
                assert!(!w.contains(&food));
                assert!(!snake.contains(&food));
                assert!(food.x >= 1 && food.x <= 30);
                assert!(food.y >= 1 && food.y <= 22);
            }
        }
    }

    #[test]
    fn test_same_seed_same_food() {
        let w = walls(3, 20, 16);
        let snake = vec![Position::new(10, 8)];
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(
                place_food(&mut a, 20, 16, &snake, &w),
                place_food(&mut b, 20, 16, &snake, &w)
            );
        }
    }

    #[test]
    fn test_crowded_board_finds_last_free_cell() {
        let mut rng = Pcg32::seed_from_u64(1);
        let w = walls(1, 8, 8);
        // Fill the 6x6 interior except (4, 4)
        let snake: Vec<Position> = (1..7)
            .flat_map(|y| (1..7).map(move |x| Position::new(x, y)))
            .filter(|p| *p != Position::new(4, 4))
            .collect();
        assert_eq!(place_food(&mut rng, 8, 8, &snake, &w), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_full_board_has_no_food() {
        let mut rng = Pcg32::seed_from_u64(1);
        let w = walls(1, 8, 8);
        let snake: Vec<Position> = (1..7)
            .flat_map(|y| (1..7).map(move |x| Position::new(x, y)))
            .collect();
        assert_eq!(place_food(&mut rng, 8, 8, &snake, &w), None);
    }
}
