//! Persistence: per-profile highscores, the leaderboard log and its exports.
//!
//! All of it is best effort. Readers skip what they cannot parse, and writers
//! report failures to the caller without retrying or rolling back.

pub mod export;
pub mod highscore;
pub mod leaderboard;
pub mod paths;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::info;

pub use export::{HTML_LIMIT, JSON_LIMIT, export_html, export_json, render_html, render_json};
pub use highscore::{load_highscore, save_highscore};
pub use leaderboard::{Leaderboard, LeaderboardEntry, VIEW_LIMIT, append_entry};
pub use paths::DataPaths;

use crate::config::Features;
use crate::game::Session;

/// Storage error wrapper.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Replace the file at `path`, creating parent directories as needed
pub fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| StoreError::io(path, e))
}

/// Current Unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// What game-over bookkeeping wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverReport {
    pub new_best: bool,
    pub entry: Option<LeaderboardEntry>,
}

/// Writes the results of finished games for one player
#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    paths: DataPaths,
    features: Features,
    player: String,
}

impl ScoreKeeper {
    pub fn new(paths: DataPaths, features: Features, player: impl Into<String>) -> Self {
        Self {
            paths,
            features,
            player: player.into(),
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Stored best score for a profile
    pub fn load_best(&self, profile: u32) -> u32 {
        load_highscore(&self.paths.highscore(profile))
    }

    /// Persist the session's best if it beats the stored one
    pub fn save_best(&self, session: &Session) -> Result<bool, StoreError> {
        let path = self.paths.highscore(session.config.profile);
        if session.best <= load_highscore(&path) {
            return Ok(false);
        }
        save_highscore(&path, session.best)?;
        info!(profile = session.config.profile, best = session.best, "saved new best");
        Ok(true)
    }

    /// Bookkeeping for a session that just ended: best score, then one
    /// leaderboard record when the leaderboard is enabled
    pub fn record_game_over(
        &self,
        session: &Session,
        timestamp: u64,
    ) -> Result<GameOverReport, StoreError> {
        let new_best = self.save_best(session)?;

        let entry = if self.features.leaderboard {
            let entry = LeaderboardEntry::from_session(session, &self.player, timestamp);
            append_entry(&self.paths.leaderboard(), &entry)?;
            Some(entry)
        } else {
            None
        };

        info!(
            score = session.score,
            level = session.level,
            reason = ?session.end_reason,
            "game over"
        );
        Ok(GameOverReport { new_best, entry })
    }

    pub fn leaderboard(&self) -> Result<Leaderboard, StoreError> {
        Leaderboard::load(&self.paths.leaderboard())
    }

    /// Load the leaderboard and write the HTML export; returns its path
    pub fn export_html(&self) -> Result<PathBuf, StoreError> {
        let path = self.paths.leaderboard_html();
        export_html(&path, &self.leaderboard()?.entries)?;
        Ok(path)
    }

    /// Load the leaderboard and write the JSON export; returns its path
    pub fn export_json(&self) -> Result<PathBuf, StoreError> {
        let path = self.paths.leaderboard_json();
        export_json(&path, &self.leaderboard()?.entries)?;
        Ok(path)
    }
}
