//! Window manager tunables, loadable from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window manager config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid window manager config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub taskbar_height: i32,
    pub min_window_width: i32,
    pub min_window_height: i32,
    pub dialog_width: i32,
    pub dialog_height: i32,
    /// Offset of the first cascaded window from the desktop origin.
    pub cascade_origin: i32,
    pub cascade_step: i32,
    /// Number of cascade slots before placement wraps back to the origin.
    pub cascade_slots: i32,
    /// Share of the desktop used when leaving fullscreen without a snapshot.
    pub fullscreen_fallback_ratio: f64,
    /// Key the persistence bridge stores window states under.
    pub storage_key: String,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            taskbar_height: 38,
            min_window_width: 220,
            min_window_height: 140,
            dialog_width: 320,
            dialog_height: 150,
            cascade_origin: 40,
            cascade_step: 20,
            cascade_slots: 8,
            fullscreen_fallback_ratio: 0.7,
            storage_key: "windowStates".to_string(),
        }
    }
}

impl WindowManagerConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when a
    /// value is out of range.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_window_width <= 0 || self.min_window_height <= 0 {
            return Err(ConfigError::Invalid(
                "minimum window size must be positive".to_string(),
            ));
        }
        if self.cascade_slots <= 0 {
            return Err(ConfigError::Invalid(
                "cascade_slots must be positive".to_string(),
            ));
        }
        if !(self.fullscreen_fallback_ratio > 0.0 && self.fullscreen_fallback_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "fullscreen_fallback_ratio must be in (0, 1], got {}",
                self.fullscreen_fallback_ratio
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = WindowManagerConfig::from_toml_str(include_str!("../window_manager.toml"))
            .expect("shipped config parses");
        assert_eq!(shipped, WindowManagerConfig::default());
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let config = WindowManagerConfig::from_toml_str("taskbar_height = 48\n").expect("parse");
        assert_eq!(config.taskbar_height, 48);
        assert_eq!(config.min_window_width, 220);
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let err = WindowManagerConfig::from_toml_str("fullscreen_fallback_ratio = 1.5\n")
            .expect_err("ratio above one");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = WindowManagerConfig::from_toml_str("taskbar_height = ").expect_err("bad toml");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
