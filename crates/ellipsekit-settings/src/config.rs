//! Configuration management for EllipseKit
//!
//! Configuration is organized into two sections:
//! - Ring parameters (point count, radii, shared motion tuning)
//! - Synchronizer settings (settling delay, clear policy, naming)
//!
//! Files may be JSON or TOML, chosen by extension.

use ellipsekit_core::program::MoveType;
use ellipsekit_core::EllipseParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Upper bound for the post-removal settling delay
pub const MAX_SETTLE_DELAY_MS: u64 = 10_000;

/// How stale generated children are cleared before a new ring is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClearPolicy {
    /// Remove only the most recently added child per edit
    #[default]
    LastChild,
    /// Repeat the single-child removal until no children remain
    AllChildren,
}

impl std::fmt::Display for ClearPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastChild => write!(f, "last child"),
            Self::AllChildren => write!(f, "all children"),
        }
    }
}

/// Ring synchronizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Wait after a removal before re-reading the children (ms)
    pub settle_delay_ms: u64,
    /// Which stale children are removed
    pub clear_policy: ClearPolicy,
    /// Ring points are named `<prefix><index>`
    pub point_name_prefix: String,
    /// Label shown on the move screen when capturing the center
    pub move_screen_label: String,
    /// Motion type of generated commands
    pub move_type: MoveType,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 200,
            clear_policy: ClearPolicy::default(),
            point_name_prefix: "EllipsePoint".to_string(),
            move_screen_label: "center pose".to_string(),
            move_type: MoveType::Linear,
        }
    }
}

impl SyncSettings {
    /// Settling delay as a duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Suggested variable name for ring point `index`
    pub fn point_name(&self, index: usize) -> String {
        format!("{}{}", self.point_name_prefix, index)
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Ring geometry and motion tuning
    pub ring: EllipseParameters,
    /// Synchronizer behavior
    pub sync: SyncSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location under the platform config directory
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("ellipsekit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("platform config directory unavailable".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load config from file, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.ring
            .validate()
            .map_err(|e| SettingsError::InvalidSetting {
                key: "ring".to_string(),
                reason: e.to_string(),
            })?;

        if self.sync.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::ValueOutOfRange {
                key: "sync.settleDelayMs".to_string(),
                value: self.sync.settle_delay_ms.to_string(),
            }
            .into());
        }

        if self.sync.point_name_prefix.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "sync.pointNamePrefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.sync.settle_delay(), Duration::from_millis(200));
        assert_eq!(config.sync.clear_policy, ClearPolicy::LastChild);
        assert_eq!(config.sync.point_name(3), "EllipsePoint3");
        assert_eq!(config.ring.number_of_waypoints, 16);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [ring]
            numberOfWaypoints = 8
            horizontalRadius = 0.1

            [sync]
            clearPolicy = "allChildren"
            "#,
        )
        .unwrap();
        assert_eq!(config.ring.number_of_waypoints, 8);
        assert_eq!(config.ring.horizontal_radius, 0.1);
        assert_eq!(config.ring.vertical_radius, 0.12);
        assert_eq!(config.sync.clear_policy, ClearPolicy::AllChildren);
        assert_eq!(config.sync.settle_delay_ms, 200);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::new();
        config.sync.settle_delay_ms = MAX_SETTLE_DELAY_MS + 1;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));

        let mut config = Config::new();
        config.sync.point_name_prefix = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut config = Config::new();
        config.ring.tool_acceleration = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Config::new().save_to_file(Path::new("config.yaml"));
        assert!(matches!(
            result,
            Err(SettingsError::Config(ConfigError::UnsupportedFormat(_)))
        ));
    }
}
