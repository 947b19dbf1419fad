//! Challenge codes
//!
//! A challenge code is a shareable string carrying everything needed to replay
//! the same session: `v1:<seed>:<cols>:<rows>:<wrap 0|1>:<speed>:<preset>`.
//! Decoding is all-or-nothing; a code that fails any check yields an error and
//! no partial parameters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::game::GameConfig;

const VERSION_PREFIX: &str = "v1:";
const FIELD_COUNT: usize = 7;

/// Parameters carried by a challenge code.
///
/// Values are kept exactly as decoded; range clamping happens where the code
/// is applied to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub seed: u32,
    pub cols: i32,
    pub rows: i32,
    pub wrap: bool,
    pub speed: i32,
    pub preset: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("challenge code must start with \"v1:\"")]
    UnsupportedVersion,
    #[error("challenge code has {0} fields, expected 7")]
    FieldCount(usize),
    #[error("challenge field `{field}` is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl Challenge {
    /// Capture the parameters of a running configuration
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            seed: config.seed,
            cols: config.cols as i32,
            rows: config.rows as i32,
            wrap: config.wrap,
            speed: config.speed_ms as i32,
            preset: config.preset as i32,
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{VERSION_PREFIX}{}:{}:{}:{}:{}:{}",
            self.seed,
            self.cols,
            self.rows,
            u8::from(self.wrap),
            self.speed,
            self.preset
        )
    }
}

impl FromStr for Challenge {
    type Err = ChallengeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with(VERSION_PREFIX) {
            return Err(ChallengeError::UnsupportedVersion);
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != FIELD_COUNT {
            return Err(ChallengeError::FieldCount(parts.len()));
        }

        Ok(Self {
            seed: field(parts[1], "seed")?,
            cols: field(parts[2], "cols")?,
            rows: field(parts[3], "rows")?,
            wrap: field::<i32>(parts[4], "wrap")? != 0,
            speed: field(parts[5], "speed")?,
            preset: field(parts[6], "preset")?,
        })
    }
}

fn field<T: FromStr>(value: &str, name: &'static str) -> Result<T, ChallengeError> {
    value.trim().parse().map_err(|_| ChallengeError::InvalidNumber {
        field: name,
        value: value.to_string(),
    })
}

/// Encode session parameters as a challenge code
pub fn encode(seed: u32, cols: i32, rows: i32, wrap: bool, speed: i32, preset: i32) -> String {
    Challenge {
        seed,
        cols,
        rows,
        wrap,
        speed,
        preset,
    }
    .to_string()
}

/// Decode a challenge code
pub fn decode(code: &str) -> Result<Challenge, ChallengeError> {
    code.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        assert_eq!(encode(42, 32, 24, true, 120, 3), "v1:42:32:24:1:120:3");
        assert_eq!(encode(0, 8, 8, false, 30, 0), "v1:0:8:8:0:30:0");
    }

    #[test]
    fn test_round_trip_extreme_seeds() {
        for seed in [0, 1, 0x7FFF_FFFF, 0xFFFF_FFFF] {
            let decoded = decode(&encode(seed, 96, 72, true, 400, 4)).unwrap();
            assert_eq!(
                decoded,
                Challenge {
                    seed,
                    cols: 96,
                    rows: 72,
                    wrap: true,
                    speed: 400,
                    preset: 4,
                }
            );
        }
    }

    #[test]
    fn test_wrong_version_fails() {
        assert_eq!(decode("v2:1:2:3:0:4:5"), Err(ChallengeError::UnsupportedVersion));
        assert_eq!(decode("1:2:3:0:4:5:6"), Err(ChallengeError::UnsupportedVersion));
        assert_eq!(decode(""), Err(ChallengeError::UnsupportedVersion));
    }

    #[test]
    fn test_wrong_field_count_fails() {
        assert_eq!(decode("v1:1:2:3"), Err(ChallengeError::FieldCount(4)));
        assert_eq!(decode("v1:1:2:3:0:4:5:6"), Err(ChallengeError::FieldCount(8)));
    }

    #[test]
    fn test_non_numeric_field_fails() {
        assert!(matches!(
            decode("v1:1:abc:3:0:4:5"),
            Err(ChallengeError::InvalidNumber { field: "cols", .. })
        ));
        assert!(matches!(
            decode("v1:-1:2:3:0:4:5"),
            Err(ChallengeError::InvalidNumber { field: "seed", .. })
        ));
        assert!(decode("v1:1:2:3:0:4:").is_err());
    }

    #[test]
    fn test_failure_leaves_prior_value_untouched() {
        let mut current = decode("v1:9:20:20:0:100:1").unwrap();
        if let Ok(parsed) = decode("v1:1:2:3") {
            current = parsed;
        }
        assert_eq!(current.seed, 9);
        assert_eq!(current.cols, 20);
    }

    #[test]
    fn test_nonzero_wrap_is_true() {
        assert!(decode("v1:1:20:20:7:100:1").unwrap().wrap);
        assert!(!decode("v1:1:20:20:0:100:1").unwrap().wrap);
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig::new(40, 30).with_seed(1234).with_wrap(true);
        let code = Challenge::from_config(&config).to_string();
        assert_eq!(code, "v1:1234:40:30:1:120:0");
    }
}
