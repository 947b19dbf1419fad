use tracing::info;

use super::theme::ColorOverrides;
use super::{
    AppConfig, Features, MAX_COLS, MAX_PROFILE, MAX_ROWS, MAX_SPEED_MS, MIN_COLS, MIN_ROWS,
    MIN_SPEED_MS,
};
use crate::challenge::{self, ChallengeError};

/// Start-up overrides, already parsed from the command line.
///
/// Applied after the profile's config file has been loaded. A challenge code
/// is applied last and wins over the individual grid, speed, seed and wrap
/// values.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub profile: Option<u32>,
    pub colors: ColorOverrides,
    pub cols: Option<u32>,
    pub rows: Option<u32>,
    pub speed_ms: Option<u32>,
    pub seed: Option<i64>,
    pub wrap: Option<bool>,
    pub challenge: Option<String>,
}

impl SessionOverrides {
    /// Profile slot to load, clamped to 1..=5; fixed to 1 without profiles
    pub fn profile(&self, features: Features) -> u32 {
        if !features.profiles {
            return 1;
        }
        self.profile.unwrap_or(1).clamp(1, MAX_PROFILE)
    }

    /// Apply onto `config`. Everything but an invalid challenge code is
    /// applied; a bad code is reported and leaves the config as the other
    /// overrides made it.
    pub fn apply(&self, config: &mut AppConfig, features: Features) -> Result<(), ChallengeError> {
        config.profile = self.profile(features);

        if !self.colors.is_empty() {
            self.colors.apply_to(&mut config.theme);
            config.color_overrides = self.colors;
        }
        if let Some(cols) = self.cols {
            config.cols = cols.clamp(MIN_COLS, MAX_COLS);
        }
        if let Some(rows) = self.rows {
            config.rows = rows.clamp(MIN_ROWS, MAX_ROWS);
        }
        if let Some(speed) = self.speed_ms {
            config.speed_ms = speed.clamp(MIN_SPEED_MS, MAX_SPEED_MS);
        }
        if let Some(seed) = self.seed {
            config.seed = seed_from_arg(seed);
        }
        if let Some(wrap) = self.wrap {
            config.wrap = wrap;
        }

        if !features.challenge {
            return Ok(());
        }
        if let Some(code) = &self.challenge {
            let c = challenge::decode(code)?;
            config.seed = c.seed;
            config.cols = clamp_i32(c.cols, MIN_COLS, MAX_COLS);
            config.rows = clamp_i32(c.rows, MIN_ROWS, MAX_ROWS);
            config.wrap = c.wrap;
            config.speed_ms = clamp_i32(c.speed, MIN_SPEED_MS, MAX_SPEED_MS);
            // Out-of-range indices select the custom theme, so only negatives are folded
            config.preset = c.preset.max(0) as u32;
            info!(code = %code, "applied challenge");
        }
        Ok(())
    }
}

/// Fold any signed value into the 32-bit seed space: `|seed| mod (2^32 - 1)`
fn seed_from_arg(seed: i64) -> u32 {
    (seed.unsigned_abs() % u64::from(u32::MAX)) as u32
}

fn clamp_i32(value: i32, min: u32, max: u32) -> u32 {
    value.clamp(min as i32, max as i32) as u32
}
