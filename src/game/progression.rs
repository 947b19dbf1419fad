/// Highest reachable level
pub const MAX_LEVEL: u32 = 8;

/// Points needed per level step
pub const POINTS_PER_LEVEL: u32 = 5;

/// Fastest tick interval the speed-up can reach
pub const MIN_TICK_MS: u32 = 30;

/// Interval reduction applied for every food eaten
pub const SPEEDUP_MS: u32 = 3;

/// Level for a cumulative score: `min(8, 1 + score / 5)`
pub fn level_for_score(score: u32) -> u32 {
    (1 + score / POINTS_PER_LEVEL).min(MAX_LEVEL)
}

/// Tick interval after one more food, floored at [`MIN_TICK_MS`].
///
/// An interval already at or below the floor is left as is.
pub fn next_tick_ms(current: u32) -> u32 {
    if current > MIN_TICK_MS {
        current.saturating_sub(SPEEDUP_MS).max(MIN_TICK_MS)
    } else {
        current
    }
}
