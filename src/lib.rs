//! gridsnake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic: session state machine, walls, levels, food (game module)
//! - Persistent configuration and color themes (config module)
//! - Highscores, the leaderboard log and its exports (storage module)
//! - Shareable challenge codes (challenge module)
//! - TUI rendering and input (render, input modules)
//! - The interactive and headless front ends (modes module)

pub mod challenge;
pub mod config;
pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod storage;
