use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a #RRGGBB color, got {0:?}")]
pub struct ColorParseError(String);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Scale every channel by `factor` (0.0..=1.0)
    pub fn dimmed(&self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * f).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim()).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

/// Colors for the five drawable roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Rgb,
    pub grid: Rgb,
    pub food: Rgb,
    pub head: Rgb,
    pub body: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        PRESETS[0]
    }
}

/// Bundled presets, selected by index
pub const PRESETS: [Theme; 5] = [
    Theme {
        bg: Rgb::new(16, 16, 16),
        grid: Rgb::new(40, 40, 40),
        food: Rgb::new(220, 50, 47),
        head: Rgb::new(38, 139, 210),
        body: Rgb::new(133, 153, 0),
    },
    Theme {
        bg: Rgb::new(15, 15, 20),
        grid: Rgb::new(55, 55, 70),
        food: Rgb::new(255, 203, 0),
        head: Rgb::new(0, 168, 255),
        body: Rgb::new(106, 255, 106),
    },
    Theme {
        bg: Rgb::new(10, 10, 10),
        grid: Rgb::new(50, 50, 50),
        food: Rgb::new(255, 105, 180),
        head: Rgb::new(173, 216, 230),
        body: Rgb::new(152, 251, 152),
    },
    Theme {
        bg: Rgb::new(24, 24, 24),
        grid: Rgb::new(60, 60, 60),
        food: Rgb::new(255, 87, 51),
        head: Rgb::new(88, 214, 141),
        body: Rgb::new(52, 152, 219),
    },
    Theme {
        bg: Rgb::new(0, 0, 0),
        grid: Rgb::new(70, 70, 70),
        food: Rgb::new(255, 59, 48),
        head: Rgb::new(255, 255, 255),
        body: Rgb::new(180, 180, 180),
    },
];

/// Per-role color overrides; `None` keeps the underlying theme's color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorOverrides {
    pub bg: Option<Rgb>,
    pub grid: Option<Rgb>,
    pub food: Option<Rgb>,
    pub head: Option<Rgb>,
    pub body: Option<Rgb>,
}

impl ColorOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, theme: &mut Theme) {
        for (slot, color) in [
            (&mut theme.bg, self.bg),
            (&mut theme.grid, self.grid),
            (&mut theme.food, self.food),
            (&mut theme.head, self.head),
            (&mut theme.body, self.body),
        ] {
            if let Some(color) = color {
                *slot = color;
            }
        }
    }
}
