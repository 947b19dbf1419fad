/// Parameters a session is started from.
///
/// These are exactly the values a challenge code carries, plus the profile
/// slot the session's best score belongs to. Everything else in a session is
/// derived from them and the seeded RNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the session RNG
    pub seed: u32,
    /// Width of the game grid, border included
    pub cols: u32,
    /// Height of the game grid, border included
    pub rows: u32,
    /// Toroidal edges instead of out-of-bounds deaths
    pub wrap: bool,
    /// Starting tick interval in milliseconds
    pub speed_ms: u32,
    /// Color preset index, carried for leaderboard and challenge codes
    pub preset: u32,
    /// Profile slot (1..=5)
    pub profile: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            cols: 32,
            rows: 24,
            wrap: false,
            speed_ms: 120,
            preset: 0,
            profile: 1,
            initial_snake_length: 3,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(12, 12)
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }
}
