//! Theme lookups for the waveform colors.
//!
//! A theme is anything that can answer "which color plays role X". The view
//! only needs three roles and resolves them once per render into a
//! [`Palette`], falling back to the foreground color when a role is missing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ROLE_FOREGROUND: &str = "foreground";
pub const ROLE_DIMMED: &str = "dimmed";
pub const ROLE_ACCENT: &str = "accent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Color must look like #rrggbb, got '{s}'"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("Color must look like #rrggbb, got '{s}'"))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub trait Theme {
    fn lookup_color(&self, role: &str) -> Option<Color>;
}

/// A theme with no colors at all; everything resolves to the built-in default
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTheme;

impl Theme for NoTheme {
    fn lookup_color(&self, _role: &str) -> Option<Color> {
        None
    }
}

/// Colors resolved for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Bars at or left of the playback divider
    pub left: Color,
    /// Bars right of the playback divider
    pub right: Color,
    pub divider: Color,
}

impl Palette {
    pub fn resolve(theme: &dyn Theme) -> Self {
        let foreground = theme.lookup_color(ROLE_FOREGROUND).unwrap_or(Color::WHITE);
        Self {
            left: foreground,
            right: theme.lookup_color(ROLE_DIMMED).unwrap_or(foreground),
            divider: theme.lookup_color(ROLE_ACCENT).unwrap_or(foreground),
        }
    }
}

/// User-configurable theme, stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub foreground: Option<Color>,
    #[serde(default)]
    pub dimmed: Option<Color>,
    #[serde(default)]
    pub accent: Option<Color>,
    #[serde(default)]
    pub high_contrast: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            foreground: Some(Color::rgb(0, 255, 100)),
            dimmed: Some(Color::rgb(0, 100, 50)),
            accent: Some(Color::rgb(255, 150, 0)),
            high_contrast: false,
        }
    }
}

impl ThemeConfig {
    pub fn toggle_high_contrast(&mut self) {
        self.high_contrast = !self.high_contrast;
    }
}

impl Theme for ThemeConfig {
    fn lookup_color(&self, role: &str) -> Option<Color> {
        if self.high_contrast {
            return match role {
                ROLE_FOREGROUND => Some(Color::WHITE),
                ROLE_DIMMED => Some(Color::rgb(128, 128, 128)),
                ROLE_ACCENT => Some(Color::rgb(255, 255, 0)),
                _ => None,
            };
        }
        match role {
            ROLE_FOREGROUND => self.foreground,
            ROLE_DIMMED => self.dimmed,
            ROLE_ACCENT => self.accent,
            _ => None,
        }
    }
}
