use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::action::Direction;
use super::config::GameConfig;
use super::food::place_food;
use super::walls::{WallSet, walls};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Map the position onto a `cols` x `rows` torus
    pub fn wrapped(&self, cols: u32, rows: u32) -> Self {
        Self {
            x: self.x.rem_euclid(cols as i32),
            y: self.y.rem_euclid(rows as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Head left the grid with wrap disabled
    OutOfBounds,
    /// Head hit a wall cell
    Wall,
    /// Head hit the snake's own body
    SelfCollision,
    /// No free interior cell remained for food
    BoardFull,
}

/// Simulation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    Over,
}

/// One game in progress.
///
/// The session owns its RNG. It is seeded once from `config.seed` and only
/// reseeded by [`Session::new_game`]; [`Session::restart`] keeps drawing from
/// the same stream.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub snake: Snake,
    /// Body as it was before the latest tick, for interpolated drawing
    pub prev_snake: Vec<Position>,
    /// Direction latched for the next tick
    pub pending_direction: Direction,
    pub walls: WallSet,
    pub food: Position,
    pub score: u32,
    /// Best score of the session's profile, updated at game over
    pub best: u32,
    pub level: u32,
    /// Current tick interval in milliseconds
    pub tick_ms: u32,
    pub steps: u32,
    pub status: Status,
    pub end_reason: Option<EndReason>,
    pub(super) rng: Pcg32,
}

impl Session {
    /// Start a session from `config`, carrying the profile's stored best score
    pub fn new(config: GameConfig, best: u32) -> Self {
        let rng = Pcg32::seed_from_u64(u64::from(config.seed));
        let snake = Self::initial_snake(&config);

        let mut session = Self {
            prev_snake: snake.body.clone(),
            pending_direction: snake.direction,
            snake,
            walls: WallSet::new(),
            food: Position::new(0, 0),
            score: 0,
            best,
            level: 1,
            tick_ms: config.speed_ms,
            steps: 0,
            status: Status::Running,
            end_reason: None,
            rng,
            config,
        };
        session.reset_board();
        session
    }

    /// Reset to a fresh board, continuing the current RNG stream
    pub fn restart(&mut self) {
        self.reset_board();
    }

    /// Reseed from `seed` and reset to a fresh board
    pub fn new_game(&mut self, seed: u32) {
        self.config.seed = seed;
        self.rng = Pcg32::seed_from_u64(u64::from(seed));
        self.reset_board();
    }

    fn initial_snake(config: &GameConfig) -> Snake {
        let head = Position::new((config.cols / 2) as i32, (config.rows / 2) as i32);
        Snake::new(head, Direction::Right, config.initial_snake_length)
    }

    fn reset_board(&mut self) {
        self.snake = Self::initial_snake(&self.config);
        self.prev_snake = self.snake.body.clone();
        self.pending_direction = self.snake.direction;
        self.score = 0;
        self.level = 1;
        self.tick_ms = self.config.speed_ms;
        self.steps = 0;
        self.status = Status::Running;
        self.end_reason = None;
        self.walls = walls(self.level, self.config.cols, self.config.rows);
        if !self.respawn_food() {
            self.end(EndReason::BoardFull);
        }
    }

    /// Place food on a free interior cell; false when none is left
    pub(super) fn respawn_food(&mut self) -> bool {
        match place_food(
            &mut self.rng,
            self.config.cols,
            self.config.rows,
            &self.snake.body,
            &self.walls,
        ) {
            Some(food) => {
                self.food = food;
                true
            }
            None => false,
        }
    }

    pub(super) fn end(&mut self, reason: EndReason) {
        self.status = Status::Over;
        self.end_reason = Some(reason);
        self.bank_score();
    }

    /// Raise `best` to the current score if it is higher
    pub fn bank_score(&mut self) -> bool {
        if self.score > self.best {
            self.best = self.score;
            return true;
        }
        false
    }

    /// Latch a direction for the next tick.
    ///
    /// Rejected (returns false) when the game is over or when `direction`
    /// reverses the current heading. Accepted while paused.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status == Status::Over || direction.is_opposite(self.snake.direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Toggle between Running and Paused; no effect once Over
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            Status::Running => Status::Paused,
            Status::Paused => Status::Running,
            Status::Over => Status::Over,
        };
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::Over
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.config.cols as i32
            && pos.y >= 0
            && pos.y < self.config.rows as i32
    }

    /// Read-only view for the frame loop
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake.body,
            prev_snake: &self.prev_snake,
            food: self.food,
            walls: &self.walls,
            score: self.score,
            best: self.best,
            level: self.level,
            status: self.status,
            cols: self.config.cols,
            rows: self.config.rows,
            wrap: self.config.wrap,
            tick_ms: self.tick_ms,
            seed: self.config.seed,
            profile: self.config.profile,
        }
    }
}

/// What a renderer gets to see each frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a [Position],
    pub prev_snake: &'a [Position],
    pub food: Position,
    pub walls: &'a WallSet,
    pub score: u32,
    pub best: u32,
    pub level: u32,
    pub status: Status,
    pub cols: u32,
    pub rows: u32,
    pub wrap: bool,
    pub tick_ms: u32,
    pub seed: u32,
    pub profile: u32,
}
