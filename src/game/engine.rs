use super::{
    action::GameEvent,
    progression::{level_for_score, next_tick_ms},
    state::{EndReason, Position, Session, Status},
    walls::walls,
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether eating moved the session to a new level
    pub level_changed: bool,
    /// Why the game ended, if it ended on this step
    pub end_reason: Option<EndReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Side effect for audio/HUD collaborators
    pub event: Option<GameEvent>,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle(terminated: bool) -> Self {
        Self {
            terminated,
            event: None,
            info: StepInfo {
                ate_food: false,
                level_changed: false,
                end_reason: None,
            },
        }
    }
}

impl Session {
    /// Execute one tick.
    ///
    /// Only a Running session advances; Paused and Over sessions are left
    /// untouched. A tick either commits a full move or ends the game.
    pub fn step(&mut self) -> StepResult {
        if self.status != Status::Running {
            return StepResult::idle(self.status == Status::Over);
        }

        self.prev_snake.clone_from(&self.snake.body);
        self.snake.direction = self.pending_direction;

        let mut new_head = self.snake.head().moved_in_direction(self.snake.direction);
        if self.config.wrap {
            new_head = new_head.wrapped(self.config.cols, self.config.rows);
        }

        self.steps += 1;

        if let Some(reason) = self.check_collision(new_head) {
            self.end(reason);
            return StepResult {
                terminated: true,
                event: Some(GameEvent::Hit),
                info: StepInfo {
                    ate_food: false,
                    level_changed: false,
                    end_reason: Some(reason),
                },
            };
        }

        let ate_food = new_head == self.food;
        self.snake.advance(new_head, ate_food);

        if !ate_food {
            return StepResult::idle(false);
        }

        self.score += 1;
        self.tick_ms = next_tick_ms(self.tick_ms);

        let level = level_for_score(self.score);
        let level_changed = level != self.level;
        self.level = level;
        self.walls = walls(self.level, self.config.cols, self.config.rows);

        let mut end_reason = None;
        if !self.respawn_food() {
            self.end(EndReason::BoardFull);
            end_reason = Some(EndReason::BoardFull);
        }

        StepResult {
            terminated: end_reason.is_some(),
            event: Some(GameEvent::Eat),
            info: StepInfo {
                ate_food: true,
                level_changed,
                end_reason,
            },
        }
    }

    /// First collision the new head would cause, checked in order:
    /// bounds, walls, then every current segment including the tail.
    fn check_collision(&self, pos: Position) -> Option<EndReason> {
        if !self.config.wrap && !self.is_in_bounds(pos) {
            return Some(EndReason::OutOfBounds);
        }

        if self.walls.contains(&pos) {
            return Some(EndReason::Wall);
        }

        // The tail still counts even though it would move away this tick
        if self.snake.occupies(pos) {
            return Some(EndReason::SelfCollision);
        }

        None
    }
}
