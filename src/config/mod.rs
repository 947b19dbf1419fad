//! Per-profile application configuration
//!
//! [`AppConfig`] is what gets persisted for a profile. It is layered at start-up:
//! defaults, then the profile's config file, then [`SessionOverrides`] from the
//! command line. [`AppConfig::game_config`] turns the result into the clamped
//! parameters a session runs with.

pub mod file;
pub mod overrides;
pub mod theme;

use std::time::{SystemTime, UNIX_EPOCH};

pub use file::{FIELDS, apply_config_text, load_config, render_config_text, save_config};
pub use overrides::SessionOverrides;
pub use theme::{ColorOverrides, PRESETS, Rgb, Theme};

use crate::game::GameConfig;

pub const MIN_COLS: u32 = 8;
pub const MAX_COLS: u32 = 96;
pub const MIN_ROWS: u32 = 8;
pub const MAX_ROWS: u32 = 72;
pub const MIN_SPEED_MS: u32 = 30;
pub const MAX_SPEED_MS: u32 = 400;
pub const MAX_PROFILE: u32 = 5;
pub const SPEED_STEP_MS: u32 = 5;
pub const MIN_OVERLAY_ALPHA: u32 = 40;
pub const MAX_OVERLAY_ALPHA: u32 = 240;
pub const OVERLAY_ALPHA_STEP: u32 = 10;

/// Which optional subsystems are active.
///
/// The reduced "classic" game is just [`Features::classic`]: one fixed profile,
/// no leaderboard, no challenge codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub profiles: bool,
    pub leaderboard: bool,
    pub challenge: bool,
}

impl Features {
    pub fn full() -> Self {
        Self {
            profiles: true,
            leaderboard: true,
            challenge: true,
        }
    }

    pub fn classic() -> Self {
        Self {
            profiles: false,
            leaderboard: false,
            challenge: false,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Custom colors, used when `preset` is out of range
    pub theme: Theme,
    pub wrap: bool,
    pub speed_ms: u32,
    pub cols: u32,
    pub rows: u32,
    /// Opacity of the dimming behind overlays (0..=255)
    pub overlay_alpha: u32,
    pub preset: u32,
    pub profile: u32,
    pub seed: u32,
    /// Command-line colors, drawn on top of whichever theme is active
    pub color_overrides: ColorOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            wrap: false,
            speed_ms: 120,
            cols: 32,
            rows: 24,
            overlay_alpha: 160,
            preset: 0,
            profile: 1,
            seed: fresh_seed(),
            color_overrides: ColorOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Session parameters, clamped to playable ranges. The preset index is
    /// kept as is: out of range means the custom theme.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            seed: self.seed,
            cols: self.cols.clamp(MIN_COLS, MAX_COLS),
            rows: self.rows.clamp(MIN_ROWS, MAX_ROWS),
            wrap: self.wrap,
            speed_ms: self.speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS),
            preset: self.preset,
            profile: self.profile.clamp(1, MAX_PROFILE),
            ..GameConfig::default()
        }
    }

    /// Colors to draw with: the selected preset (or the custom theme when the
    /// preset index is out of range), then any command-line overrides
    pub fn active_theme(&self) -> Theme {
        let mut theme = PRESETS
            .get(self.preset as usize)
            .copied()
            .unwrap_or(self.theme);
        self.color_overrides.apply_to(&mut theme);
        theme
    }

    /// Lengthen or shorten the base tick by one step, within the speed range
    pub fn step_speed(&mut self, slower: bool) {
        self.speed_ms = if slower {
            self.speed_ms.saturating_add(SPEED_STEP_MS).min(MAX_SPEED_MS)
        } else {
            self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS)
        };
    }

    pub fn step_overlay_alpha(&mut self, up: bool) {
        self.overlay_alpha = if up {
            self.overlay_alpha.saturating_add(OVERLAY_ALPHA_STEP).min(MAX_OVERLAY_ALPHA)
        } else {
            self.overlay_alpha.saturating_sub(OVERLAY_ALPHA_STEP).max(MIN_OVERLAY_ALPHA)
        };
    }

    /// Move to the neighbouring preset, wrapping around. A custom-theme index
    /// lands on a preset.
    pub fn cycle_preset(&mut self, forward: bool) {
        let count = PRESETS.len() as u32;
        let idx = self.preset % count;
        self.preset = if forward {
            (idx + 1) % count
        } else {
            (idx + count - 1) % count
        };
    }

    /// Back to defaults, keeping what identifies this session: profile,
    /// seed and command-line colors
    pub fn reset_to_defaults(&mut self) {
        *self = AppConfig {
            profile: self.profile,
            seed: self.seed,
            color_overrides: self.color_overrides,
            ..AppConfig::default()
        };
    }
}

/// Seed derived from the wall clock, for new games without an explicit seed
pub fn fresh_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(0)
}

/// Name recorded on leaderboard entries: `$USER`, `$LOGNAME`, else "player"
pub fn player_name() -> String {
    ["USER", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "player".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.speed_ms, 120);
        assert_eq!(config.cols, 32);
        assert_eq!(config.rows, 24);
        assert_eq!(config.overlay_alpha, 160);
        assert_eq!(config.profile, 1);
        assert!(!config.wrap);
    }

    #[test]
    fn test_game_config_clamps() {
        let config = AppConfig {
            cols: 2,
            rows: 500,
            speed_ms: 5,
            preset: 99,
            profile: 9,
            ..AppConfig::default()
        };
        let game = config.game_config();

        assert_eq!(game.cols, MIN_COLS);
        assert_eq!(game.rows, MAX_ROWS);
        assert_eq!(game.speed_ms, MIN_SPEED_MS);
        assert_eq!(game.preset, 99);
        assert_eq!(game.profile, MAX_PROFILE);
        assert_eq!(game.seed, config.seed);
    }

    #[test]
    fn test_active_theme() {
        let mut config = AppConfig {
            preset: 3,
            ..AppConfig::default()
        };
        assert_eq!(config.active_theme(), PRESETS[3]);

        config.preset = 42;
        config.theme.food = Rgb::new(1, 1, 1);
        assert_eq!(config.active_theme(), config.theme);

        config.preset = 0;
        config.color_overrides.head = Some(Rgb::new(2, 2, 2));
        let theme = config.active_theme();
        assert_eq!(theme.head, Rgb::new(2, 2, 2));
        assert_eq!(theme.food, PRESETS[0].food);
    }

    #[test]
    fn test_speed_steps_stay_in_range() {
        let mut config = AppConfig {
            speed_ms: 32,
            ..AppConfig::default()
        };
        config.step_speed(false);
        assert_eq!(config.speed_ms, MIN_SPEED_MS);
        config.step_speed(true);
        assert_eq!(config.speed_ms, 35);

        config.speed_ms = 398;
        config.step_speed(true);
        assert_eq!(config.speed_ms, MAX_SPEED_MS);
    }

    #[test]
    fn test_overlay_alpha_steps_stay_in_range() {
        let mut config = AppConfig::default();
        config.step_overlay_alpha(true);
        assert_eq!(config.overlay_alpha, 170);

        config.overlay_alpha = 235;
        config.step_overlay_alpha(true);
        assert_eq!(config.overlay_alpha, MAX_OVERLAY_ALPHA);

        config.overlay_alpha = 45;
        config.step_overlay_alpha(false);
        assert_eq!(config.overlay_alpha, MIN_OVERLAY_ALPHA);

        // A loaded value below the band only moves toward it
        config.overlay_alpha = 10;
        config.step_overlay_alpha(true);
        assert_eq!(config.overlay_alpha, 20);
    }

    #[test]
    fn test_cycle_preset_wraps() {
        let mut config = AppConfig::default();
        config.cycle_preset(false);
        assert_eq!(config.preset, 4);
        config.cycle_preset(true);
        assert_eq!(config.preset, 0);

        // Custom theme index steps onto a preset like (idx +- 1) mod count
        config.preset = 7;
        config.cycle_preset(true);
        assert_eq!(config.preset, 3);
        config.preset = 7;
        config.cycle_preset(false);
        assert_eq!(config.preset, 1);
    }

    #[test]
    fn test_reset_to_defaults_keeps_identity() {
        let mut config = AppConfig {
            profile: 3,
            seed: 55,
            cols: 60,
            wrap: true,
            preset: 2,
            ..AppConfig::default()
        };
        config.color_overrides.bg = Some(Rgb::new(1, 2, 3));

        config.reset_to_defaults();

        assert_eq!(config.profile, 3);
        assert_eq!(config.seed, 55);
        assert_eq!(config.color_overrides.bg, Some(Rgb::new(1, 2, 3)));
        assert_eq!(config.cols, 32);
        assert!(!config.wrap);
        assert_eq!(config.preset, 0);
    }

    #[test]
    fn test_classic_features() {
        let classic = Features::classic();
        assert!(!classic.profiles && !classic.leaderboard && !classic.challenge);
        assert_eq!(Features::default(), Features::full());
    }
}
