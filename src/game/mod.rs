//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A [`Session`] owns its seeded RNG, so a given [`GameConfig`] always plays out
//! the same way for the same inputs.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod food;
pub mod progression;
pub mod state;
pub mod walls;

// Re-export commonly used types
pub use action::{Direction, GameEvent};
pub use clock::TickClock;
pub use config::GameConfig;
pub use engine::{StepInfo, StepResult};
pub use food::place_food;
pub use progression::{MAX_LEVEL, MIN_TICK_MS, level_for_score, next_tick_ms};
pub use state::{EndReason, Position, Session, Snake, Snapshot, Status};
pub use walls::{WallSet, walls};
