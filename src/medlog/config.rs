use crate::error::{MedlogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_EXPORT_FILENAME: &str = "medilog-export.json";

pub const KEY_EXPORT_FILENAME: &str = "export-filename";
pub const KEY_CLOCK: &str = "clock";
pub const KEYS: [&str; 2] = [KEY_EXPORT_FILENAME, KEY_CLOCK];

/// How times are shown in history listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Clock {
    #[default]
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}

impl Clock {
    /// chrono format string for a time of day.
    pub fn time_format(&self) -> &'static str {
        match self {
            Clock::H12 => "%-I:%M %p",
            Clock::H24 => "%H:%M",
        }
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clock::H12 => write!(f, "12h"),
            Clock::H24 => write!(f, "24h"),
        }
    }
}

impl FromStr for Clock {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "12" | "12h" => Ok(Clock::H12),
            "24" | "24h" => Ok(Clock::H24),
            other => Err(format!("Invalid clock: {} (expected 12h or 24h)", other)),
        }
    }
}

/// Configuration for medlog, stored as config.json in the data directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedlogConfig {
    /// File name used by `export` when no output path is given
    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    #[serde(default)]
    pub clock: Clock,
}

fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

impl Default for MedlogConfig {
    fn default() -> Self {
        Self {
            export_filename: default_export_filename(),
            clock: Clock::default(),
        }
    }
}

impl MedlogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MedlogError::Io)?;
        let config: MedlogConfig =
            serde_json::from_str(&content).map_err(MedlogError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MedlogError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MedlogError::Serialization)?;
        fs::write(config_path, content).map_err(MedlogError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            KEY_EXPORT_FILENAME => Some(self.export_filename.clone()),
            KEY_CLOCK => Some(self.clock.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_EXPORT_FILENAME => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(MedlogError::Config(
                        "export-filename cannot be empty".to_string(),
                    ));
                }
                self.export_filename = value.to_string();
            }
            KEY_CLOCK => {
                self.clock = value.parse().map_err(MedlogError::Config)?;
            }
            other => {
                return Err(MedlogError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MedlogConfig::default();
        assert_eq!(config.export_filename, "medilog-export.json");
        assert_eq!(config.clock, Clock::H12);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = MedlogConfig::load(dir.path()).unwrap();
        assert_eq!(config, MedlogConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");

        let mut config = MedlogConfig::default();
        config.set(KEY_CLOCK, "24").unwrap();
        config.set(KEY_EXPORT_FILENAME, "backup.json").unwrap();
        config.save(&nested).unwrap();

        let loaded = MedlogConfig::load(&nested).unwrap();
        assert_eq!(loaded.clock, Clock::H24);
        assert_eq!(loaded.export_filename, "backup.json");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"clock":"24h"}"#).unwrap();

        let loaded = MedlogConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.clock, Clock::H24);
        assert_eq!(loaded.export_filename, DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = MedlogConfig::default();
        assert!(config.set(KEY_CLOCK, "13h").is_err());
        assert!(config.set(KEY_EXPORT_FILENAME, "  ").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, MedlogConfig::default());
    }

    #[test]
    fn test_get_known_keys() {
        let config = MedlogConfig::default();
        assert_eq!(config.get(KEY_CLOCK).as_deref(), Some("12h"));
        assert_eq!(config.get("nope"), None);
    }
}
