//! Line-oriented `key = value` profile config.
//!
//! Every recognized key is one row in [`FIELDS`]: how to parse and store a
//! value, and how to write it back. A single loop applies the table, so an
//! unknown key or a value that fails to parse simply leaves the current
//! setting alone.

use std::path::Path;

use tracing::{debug, info};

use super::AppConfig;
use super::theme::Rgb;
use crate::storage::StoreError;

/// One recognized config key
pub struct ConfigField {
    pub key: &'static str,
    /// Parse `value` and store it; false leaves the config untouched
    apply: fn(&mut AppConfig, &str) -> bool,
    /// Value as written to disk
    render: fn(&AppConfig) -> String,
}

pub const FIELDS: &[ConfigField] = &[
    ConfigField {
        key: "wrap",
        apply: |c, v| store(&mut c.wrap, parse_bool(v)),
        render: |c| c.wrap.to_string(),
    },
    ConfigField {
        key: "speed_ms",
        apply: |c, v| store(&mut c.speed_ms, v.parse().ok()),
        render: |c| c.speed_ms.to_string(),
    },
    ConfigField {
        key: "cols",
        apply: |c, v| store(&mut c.cols, v.parse().ok()),
        render: |c| c.cols.to_string(),
    },
    ConfigField {
        key: "rows",
        apply: |c, v| store(&mut c.rows, v.parse().ok()),
        render: |c| c.rows.to_string(),
    },
    ConfigField {
        key: "overlay_alpha",
        apply: |c, v| store(&mut c.overlay_alpha, v.parse().ok()),
        render: |c| c.overlay_alpha.to_string(),
    },
    ConfigField {
        key: "preset",
        apply: |c, v| store(&mut c.preset, v.parse().ok()),
        render: |c| c.preset.to_string(),
    },
    ConfigField {
        key: "seed",
        apply: |c, v| store(&mut c.seed, parse_seed(v)),
        render: |c| c.seed.to_string(),
    },
    ConfigField {
        key: "bg",
        apply: |c, v| store(&mut c.theme.bg, Rgb::from_hex(v)),
        render: |c| quoted(c.theme.bg),
    },
    ConfigField {
        key: "grid",
        apply: |c, v| store(&mut c.theme.grid, Rgb::from_hex(v)),
        render: |c| quoted(c.theme.grid),
    },
    ConfigField {
        key: "food",
        apply: |c, v| store(&mut c.theme.food, Rgb::from_hex(v)),
        render: |c| quoted(c.theme.food),
    },
    ConfigField {
        key: "head",
        apply: |c, v| store(&mut c.theme.head, Rgb::from_hex(v)),
        render: |c| quoted(c.theme.head),
    },
    ConfigField {
        key: "body",
        apply: |c, v| store(&mut c.theme.body, Rgb::from_hex(v)),
        render: |c| quoted(c.theme.body),
    },
];

fn store<T>(slot: &mut T, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn quoted(color: Rgb) -> String {
    format!("\"{color}\"")
}

/// `true|false|1|0`, case-insensitive
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Unsigned 32-bit decimal; negative 32-bit values are taken bit-for-bit
fn parse_seed(value: &str) -> Option<u32> {
    value
        .parse::<u32>()
        .ok()
        .or_else(|| value.parse::<i32>().ok().map(|v| v as u32))
}

/// Apply config text on top of `config`. Returns how many values were taken.
pub fn apply_config_text(config: &mut AppConfig, text: &str) -> usize {
    let mut applied = 0;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = unquote(value.trim());

        match FIELDS.iter().find(|f| f.key == key) {
            Some(field) if (field.apply)(config, value) => applied += 1,
            Some(_) => debug!(key, value, "ignoring malformed config value"),
            None => debug!(key, "ignoring unknown config key"),
        }
    }

    applied
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Render every field as `key = value` lines
pub fn render_config_text(config: &AppConfig) -> String {
    FIELDS
        .iter()
        .map(|f| format!("{} = {}\n", f.key, (f.render)(config)))
        .collect()
}

/// Load a profile config file over `config`. A missing file is not an error
/// and returns `Ok(false)`.
pub fn load_config(config: &mut AppConfig, path: &Path) -> Result<bool, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    // A stray non-UTF-8 byte only spoils the value it sits in
    let text = String::from_utf8_lossy(&bytes);
    let applied = apply_config_text(config, &text);
    info!(path = %path.display(), applied, "loaded config");
    Ok(true)
}

/// Write `config` to `path`, replacing any previous file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), StoreError> {
    crate::storage::write_file(path, &render_config_text(config))?;
    info!(path = %path.display(), "saved config");
    Ok(())
}
