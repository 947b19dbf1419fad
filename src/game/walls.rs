//! Level layouts.
//!
//! Every level is the border ring plus a cumulative set of interior bars.
//! Layouts are a pure function of `(level, cols, rows)`; the session always
//! swaps in a freshly generated set instead of patching the old one.

use std::collections::HashSet;

use super::state::Position;

/// Cells that block the snake
pub type WallSet = HashSet<Position>;

/// Generate the wall layout for a level on a `cols` x `rows` grid.
///
/// - level 1: border only
/// - level 2: horizontal bar across the middle row
/// - levels 3 and 4: vertical bars at one third and two thirds of the width
/// - levels 5 and 6: dashed horizontal, then dashed vertical bars
/// - levels 7 and 8: no further additions
pub fn walls(level: u32, cols: u32, rows: u32) -> WallSet {
    let cols = cols as i32;
    let rows = rows as i32;
    let mut w = WallSet::new();

    for x in 0..cols {
        w.insert(Position::new(x, 0));
        w.insert(Position::new(x, rows - 1));
    }
    for y in 0..rows {
        w.insert(Position::new(0, y));
        w.insert(Position::new(cols - 1, y));
    }

    if level >= 2 {
        for x in 6..cols - 6 {
            w.insert(Position::new(x, rows / 2));
        }
    }
    if level >= 3 {
        for y in 4..rows - 4 {
            w.insert(Position::new(cols / 3, y));
        }
    }
    if level >= 4 {
        for y in 4..rows - 4 {
            w.insert(Position::new(2 * cols / 3, y));
        }
    }
    if level >= 5 {
        for x in (8..cols - 8).filter(|x| (x / 2) % 2 == 0) {
            w.insert(Position::new(x, 5));
            w.insert(Position::new(x, rows - 6));
        }
    }
    if level >= 6 {
        for y in (6..rows - 6).filter(|y| (y / 2) % 2 == 0) {
            w.insert(Position::new(5, y));
            w.insert(Position::new(cols - 6, y));
        }
    }

    w
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_full_border(w: &WallSet, cols: i32, rows: i32) -> bool {
        (0..cols).all(|x| w.contains(&Position::new(x, 0)) && w.contains(&Position::new(x, rows - 1)))
            && (0..rows)
                .all(|y| w.contains(&Position::new(0, y)) && w.contains(&Position::new(cols - 1, y)))
    }

    #[test]
    fn test_every_level_has_border_and_is_deterministic() {
        for (cols, rows) in [(32, 24), (8, 8), (96, 72), (17, 11)] {
            for level in 1..=8 {
                let a = walls(level, cols, rows);
                let b = walls(level, cols, rows);
                assert_eq!(a, b, "level {level} on {cols}x{rows}");
                assert!(has_full_border(&a, cols as i32, rows as i32));
            }
        }
    }

    #[test]
    fn test_level_one_is_border_only() {
        let w = walls(1, 32, 24);
        // 2 * 32 + 2 * 22 border cells
        assert_eq!(w.len(), 108);
        assert!(!w.contains(&Position::new(16, 12)));
    }

    #[test]
    fn test_level_two_adds_mid_bar() {
        let w = walls(2, 32, 24);
        assert!(w.contains(&Position::new(6, 12)));
        assert!(w.contains(&Position::new(25, 12)));
        assert!(!w.contains(&Position::new(5, 12)));
        assert!(!w.contains(&Position::new(26, 12)));
    }

    #[test]
    fn test_levels_three_and_four_add_vertical_bars() {
        let three = walls(3, 30, 24);
        assert!(three.contains(&Position::new(10, 4)));
        assert!(three.contains(&Position::new(10, 19)));
        assert!(!three.contains(&Position::new(20, 4)));

        let four = walls(4, 30, 24);
        assert!(four.contains(&Position::new(20, 4)));
        assert!(four.contains(&Position::new(20, 19)));
    }

    #[test]
    fn test_dashed_bars_alternate() {
        let five = walls(5, 32, 24);
        // (x / 2) % 2 == 0 keeps 8, 9 and drops 10, 11
        assert!(five.contains(&Position::new(8, 5)));
        assert!(five.contains(&Position::new(9, 5)));
        assert!(!five.contains(&Position::new(10, 5)));
        assert!(!five.contains(&Position::new(11, 5)));
        assert!(five.contains(&Position::new(8, 18)));

        let six = walls(6, 32, 24);
        assert!(six.contains(&Position::new(5, 8)));
        assert!(!six.contains(&Position::new(5, 10)));
        assert!(six.contains(&Position::new(26, 8)));
    }

    #[test]
    fn test_layouts_are_cumulative() {
        for level in 2..=8 {
            let lower = walls(level - 1, 32, 24);
            let upper = walls(level, 32, 24);
            assert!(lower.is_subset(&upper), "level {level}");
        }
        assert_eq!(walls(6, 32, 24), walls(8, 32, 24));
    }
}
