//! Persisted user settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::options::{BlinkSensitivityOption, ClickGesture, DwellTimeOption};
use crate::{ConfigError, Result};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "HEADTRACK_CONFIG";

/// Default minimum hit box edge, in points. Roughly a comfortable button size
/// on a phone-sized screen.
pub const DEFAULT_MINIMUM_ELEMENT_SIZE: f64 = 60.0;

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Settings consumed by the focus, click and idle engine.
///
/// These are externally owned: the engine reads them but never writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gesture that turns focus into a click
    pub click_gesture: ClickGesture,
    /// Seconds of continuous focus needed for a dwell click
    pub dwell_time_secs: f64,
    /// Blinks shorter than this are reported as too short
    pub blink_min_duration_secs: f64,
    /// Targets smaller than this (in either axis) get a padded hit box
    pub minimum_element_size: f64,
    /// User switched head tracking off
    pub disabled_by_user: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            click_gesture: ClickGesture::default(),
            dwell_time_secs: DwellTimeOption::default().seconds(),
            blink_min_duration_secs: BlinkSensitivityOption::default().seconds(),
            minimum_element_size: DEFAULT_MINIMUM_ELEMENT_SIZE,
            disabled_by_user: false,
        }
    }
}

impl Settings {
    /// Set the click gesture
    pub fn with_click_gesture(mut self, gesture: ClickGesture) -> Self {
        self.click_gesture = gesture;
        self
    }

    /// Set the dwell time from a preset
    pub fn with_dwell_time(mut self, option: DwellTimeOption) -> Self {
        self.dwell_time_secs = option.seconds();
        self
    }

    /// Set the blink threshold from a preset
    pub fn with_blink_sensitivity(mut self, option: BlinkSensitivityOption) -> Self {
        self.blink_min_duration_secs = option.seconds();
        self
    }

    /// Set the minimum element size
    pub fn with_minimum_element_size(mut self, size: f64) -> Self {
        self.minimum_element_size = size;
        self
    }

    /// Preset matching the current dwell time, if it is one.
    pub fn dwell_time_option(&self) -> Option<DwellTimeOption> {
        DwellTimeOption::from_seconds(self.dwell_time_secs)
    }

    /// Preset matching the current blink threshold, if it is one.
    pub fn blink_sensitivity_option(&self) -> Option<BlinkSensitivityOption> {
        BlinkSensitivityOption::from_seconds(self.blink_min_duration_secs)
    }

    /// Check every numeric field is usable by the engine.
    pub fn validate(&self) -> Result<()> {
        if !self.dwell_time_secs.is_finite() || self.dwell_time_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "dwell_time_secs",
                reason: format!("must be a positive number, got {}", self.dwell_time_secs),
            });
        }
        if !self.blink_min_duration_secs.is_finite() || self.blink_min_duration_secs < 0.0 {
            return Err(ConfigError::Invalid {
                field: "blink_min_duration_secs",
                reason: format!(
                    "must be zero or positive, got {}",
                    self.blink_min_duration_secs
                ),
            });
        }
        if !self.minimum_element_size.is_finite() || self.minimum_element_size < 0.0 {
            return Err(ConfigError::Invalid {
                field: "minimum_element_size",
                reason: format!(
                    "must be zero or positive, got {}",
                    self.minimum_element_size
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text, path)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist. Any other failure is reported.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write settings as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Settings file location: `$HEADTRACK_CONFIG` if set, otherwise
    /// `settings.toml` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let dirs = directories::ProjectDirs::from("org", "headtrack", "headtrack")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join(SETTINGS_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.click_gesture, ClickGesture::Blink);
        assert_eq!(settings.dwell_time_option(), Some(DwellTimeOption::Medium));
        assert_eq!(
            settings.blink_sensitivity_option(),
            Some(BlinkSensitivityOption::Highest)
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings =
            Settings::from_toml_str("click_gesture = \"dwell\"\n", Path::new("inline")).unwrap();
        assert_eq!(settings.click_gesture, ClickGesture::Dwell);
        assert_eq!(settings.dwell_time_secs, 1.5);
        assert_eq!(settings.minimum_element_size, DEFAULT_MINIMUM_ELEMENT_SIZE);
    }

    #[test]
    fn test_invalid_dwell_rejected() {
        let err = Settings::from_toml_str("dwell_time_secs = 0.0\n", Path::new("inline"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "dwell_time_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_element_size_rejected() {
        let settings = Settings::default().with_minimum_element_size(-1.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_error_reports_path() {
        let err = Settings::from_toml_str("click_gesture = 3\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings::default()
            .with_click_gesture(ClickGesture::Dwell)
            .with_dwell_time(DwellTimeOption::Fast)
            .with_blink_sensitivity(BlinkSensitivityOption::High);

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
