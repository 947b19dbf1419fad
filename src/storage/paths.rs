use std::env;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "gridsnake";

/// Where every persisted file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    data_dir: PathBuf,
    config_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Keep data and config side by side in one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref(), dir.as_ref())
    }

    /// XDG base directories, falling back to `~/.local/share` and `~/.config`,
    /// then to the working directory
    pub fn from_env() -> Self {
        Self::new(
            base_dir("XDG_DATA_HOME", ".local/share").join(APP_DIR),
            base_dir("XDG_CONFIG_HOME", ".config").join(APP_DIR),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn highscore(&self, profile: u32) -> PathBuf {
        self.data_dir.join(format!("highscore_{profile}.txt"))
    }

    pub fn config(&self, profile: u32) -> PathBuf {
        self.config_dir.join(format!("config_{profile}.conf"))
    }

    pub fn leaderboard(&self) -> PathBuf {
        self.data_dir.join("leaderboard.csv")
    }

    pub fn leaderboard_html(&self) -> PathBuf {
        self.data_dir.join("leaderboard.html")
    }

    pub fn leaderboard_json(&self) -> PathBuf {
        self.data_dir.join("leaderboard.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("gridsnake.log")
    }
}

fn base_dir(xdg_var: &str, home_suffix: &str) -> PathBuf {
    match env::var_os(xdg_var) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => match env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home).join(home_suffix),
            _ => PathBuf::from("."),
        },
    }
}
