//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Mode duration and bonus overrides
//! - Activity-check interval and grace window
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::session::{ActivityMonitor, ModeCatalog};

/// Mode duration/bonus overrides. All values fall back to the built-in
/// catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    #[serde(default = "default_short_focus_min")]
    pub short_focus_min: u64,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u64,
    #[serde(default = "default_short_completion_bonus")]
    pub short_completion_bonus: u32,
    #[serde(default = "default_long_focus_min")]
    pub long_focus_min: u64,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u64,
    #[serde(default = "default_long_completion_bonus")]
    pub long_completion_bonus: u32,
    #[serde(default = "default_infinite_milestone_bonus")]
    pub infinite_milestone_bonus: u32,
}

/// Activity verification timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_check_interval_min")]
    pub check_interval_min: u64,
    #[serde(default = "default_grace_min")]
    pub grace_min: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub modes: ModesConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

fn default_short_focus_min() -> u64 {
    25
}
fn default_short_break_min() -> u64 {
    5
}
fn default_short_completion_bonus() -> u32 {
    200
}
fn default_long_focus_min() -> u64 {
    50
}
fn default_long_break_min() -> u64 {
    10
}
fn default_long_completion_bonus() -> u32 {
    500
}
fn default_infinite_milestone_bonus() -> u32 {
    100
}
fn default_check_interval_min() -> u64 {
    45
}
fn default_grace_min() -> u64 {
    5
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            short_focus_min: default_short_focus_min(),
            short_break_min: default_short_break_min(),
            short_completion_bonus: default_short_completion_bonus(),
            long_focus_min: default_long_focus_min(),
            long_break_min: default_long_break_min(),
            long_completion_bonus: default_long_completion_bonus(),
            infinite_milestone_bonus: default_infinite_milestone_bonus(),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            check_interval_min: default_check_interval_min(),
            grace_min: default_grace_min(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("<data_dir>"),
                message: e.to_string(),
            })?
            .join("config.toml"))
    }

    /// Load from disk, or defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Write to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Build the mode catalog with this configuration's overrides applied.
    pub fn mode_catalog(&self) -> ModeCatalog {
        let mut catalog = ModeCatalog::default();
        catalog.short.focus_secs = self.modes.short_focus_min * 60;
        catalog.short.break_secs = self.modes.short_break_min * 60;
        catalog.short.completion_bonus = self.modes.short_completion_bonus;
        catalog.long.focus_secs = self.modes.long_focus_min * 60;
        catalog.long.break_secs = self.modes.long_break_min * 60;
        catalog.long.completion_bonus = self.modes.long_completion_bonus;
        catalog.infinite.milestone_bonus = self.modes.infinite_milestone_bonus;
        catalog
    }

    /// Build an activity monitor with this configuration's intervals.
    pub fn activity_monitor(&self) -> ActivityMonitor {
        ActivityMonitor::with_intervals(self.activity.check_interval_min * 60, self.activity.grace_min * 60)
    }

    /// Dotted-path getter for the CLI (`modes.short_focus_min`, ...).
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "modes.short_focus_min" => Some(self.modes.short_focus_min.to_string()),
            "modes.short_break_min" => Some(self.modes.short_break_min.to_string()),
            "modes.short_completion_bonus" => Some(self.modes.short_completion_bonus.to_string()),
            "modes.long_focus_min" => Some(self.modes.long_focus_min.to_string()),
            "modes.long_break_min" => Some(self.modes.long_break_min.to_string()),
            "modes.long_completion_bonus" => Some(self.modes.long_completion_bonus.to_string()),
            "modes.infinite_milestone_bonus" => {
                Some(self.modes.infinite_milestone_bonus.to_string())
            }
            "activity.check_interval_min" => Some(self.activity.check_interval_min.to_string()),
            "activity.grace_min" => Some(self.activity.grace_min.to_string()),
            _ => None,
        }
    }

    /// Dotted-path setter for the CLI.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let as_u64 = value.parse::<u64>().map_err(|e| invalid(e.to_string()));
        let as_u32 = value.parse::<u32>().map_err(|e| invalid(e.to_string()));
        match key {
            "modes.short_focus_min" => self.modes.short_focus_min = as_u64?,
            "modes.short_break_min" => self.modes.short_break_min = as_u64?,
            "modes.short_completion_bonus" => self.modes.short_completion_bonus = as_u32?,
            "modes.long_focus_min" => self.modes.long_focus_min = as_u64?,
            "modes.long_break_min" => self.modes.long_break_min = as_u64?,
            "modes.long_completion_bonus" => self.modes.long_completion_bonus = as_u32?,
            "modes.infinite_milestone_bonus" => self.modes.infinite_milestone_bonus = as_u32?,
            "activity.check_interval_min" => self.activity.check_interval_min = as_u64?,
            "activity.grace_min" => self.activity.grace_min = as_u64?,
            _ => return Err(ConfigError::MissingKey(key.to_string())),
        }
        Ok(())
    }

    /// Every known key with its current value, for `config list`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        const KEYS: [&str; 9] = [
            "modes.short_focus_min",
            "modes.short_break_min",
            "modes.short_completion_bonus",
            "modes.long_focus_min",
            "modes.long_break_min",
            "modes.long_completion_bonus",
            "modes.infinite_milestone_bonus",
            "activity.check_interval_min",
            "activity.grace_min",
        ];
        KEYS.iter()
            .map(|&k| (k, self.get(k).unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionMode;

    #[test]
    fn defaults_match_mode_catalog() {
        let config = Config::default();
        let catalog = config.mode_catalog();
        assert_eq!(catalog.get(SessionMode::Short).focus_secs, 1500);
        assert_eq!(catalog.get(SessionMode::Short).completion_bonus, 200);
        assert_eq!(catalog.get(SessionMode::Long).break_secs, 600);
        assert_eq!(catalog.get(SessionMode::Infinite).milestone_bonus, 100);
    }

    #[test]
    fn overrides_flow_into_catalog_and_monitor() {
        let mut config = Config::default();
        config.set("modes.short_focus_min", "30").unwrap();
        config.set("activity.check_interval_min", "60").unwrap();

        let catalog = config.mode_catalog();
        assert_eq!(catalog.get(SessionMode::Short).focus_secs, 1800);
        assert_eq!(config.get("activity.check_interval_min").unwrap(), "60");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        assert!(config.get("ui.dark_mode").is_none());
        assert!(config.set("ui.dark_mode", "true").is_err());
        assert!(config.set("modes.short_focus_min", "soon").is_err());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.modes.short_focus_min, 25);
        assert_eq!(config.activity.grace_min, 5);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.set("modes.long_focus_min", "40").unwrap();
        let raw = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&raw).unwrap();
        assert_eq!(restored.modes.long_focus_min, 40);
    }
}
