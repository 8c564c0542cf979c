//! Application configuration management.
//!
//! Configuration lives in the user's config directory (typically
//! ~/.config/scrubwave/config.toml). It holds the waveform theme, where the
//! viewer writes its log, and how fast recorded levels are replayed.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use crate::theme::{Color, ThemeConfig};

pub const CONFIG_KEYS: &[&str] = &[
    "log_file",
    "log_level",
    "replay_rate",
    "theme.foreground",
    "theme.dimmed",
    "theme.accent",
    "theme.high_contrast",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_replay_rate")]
    pub replay_rate: f64,
    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_log_file() -> String {
    std::env::temp_dir()
        .join("scrubwave.log")
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_replay_rate() -> f64 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            log_file: default_log_file(),
            log_level: default_log_level(),
            replay_rate: default_replay_rate(),
            theme: ThemeConfig::default(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("scrubwave")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("scrubwave")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, Box<dyn Error>> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| format!("Unknown log level: {}", self.log_level).into())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "log_file" => self.log_file = value.to_string(),
            "log_level" => {
                value
                    .parse::<LevelFilter>()
                    .map_err(|_| "Value must be one of off, error, warn, info, debug, trace")?;
                self.log_level = value.to_lowercase();
            }
            "replay_rate" => {
                let rate = value
                    .parse::<f64>()
                    .map_err(|_| "Value must be a number")?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err("Replay rate must be zero or positive".into());
                }
                self.replay_rate = rate;
            }
            "theme.foreground" => self.theme.foreground = parse_color(value)?,
            "theme.dimmed" => self.theme.dimmed = parse_color(value)?,
            "theme.accent" => self.theme.accent = parse_color(value)?,
            "theme.high_contrast" => {
                self.theme.high_contrast = value
                    .parse::<bool>()
                    .map_err(|_| "Value must be 'true' or 'false'")?;
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}

/// An empty value or "none" clears the color so the view falls back
fn parse_color(value: &str) -> Result<Option<Color>, Box<dyn Error>> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(value.parse::<Color>()?))
}
