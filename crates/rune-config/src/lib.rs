//! Rune Morph configuration system
//!
//! This crate provides centralized configuration for the variant transition
//! runtime, loading settings from `rune.toml` with environment overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuneConfig {
    /// Variant transition settings
    pub transitions: TransitionsConfig,
    /// Layout viewport settings
    pub layout: LayoutConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Variant transition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionsConfig {
    /// Master switch; when false every variant change snaps
    pub enabled: bool,
    /// Timing used when no override matches
    pub default: TimingConfig,
    /// Per-component timing keyed by component name
    pub overrides: BTreeMap<String, TimingConfig>,
}

/// Timing of a variant transition as written in `rune.toml`.
///
/// ```toml
/// [transitions.default]
/// type = "tween"
/// duration_ms = 250.0
/// easing = "ease_out"
///
/// [transitions.overrides.Toggle]
/// type = "disabled"
///
/// [transitions.overrides.Sheet]
/// type = "spring_preset"
/// preset = "bouncy"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimingConfig {
    /// Damped spring (unit mass)
    Spring {
        #[serde(default = "default_damping_ratio")]
        damping_ratio: f32,
        #[serde(default = "default_stiffness")]
        stiffness: f32,
        #[serde(default)]
        delay_ms: f32,
    },
    /// Spring given by mass, stiffness and damping coefficient
    CustomSpring {
        #[serde(default = "default_mass")]
        mass: f32,
        stiffness: f32,
        damping: f32,
        #[serde(default)]
        delay_ms: f32,
    },
    /// One of the named springs
    SpringPreset {
        preset: SpringPreset,
        #[serde(default)]
        delay_ms: f32,
    },
    /// Fixed-duration tween with an easing curve
    Tween {
        duration_ms: f32,
        #[serde(default)]
        delay_ms: f32,
        #[serde(default)]
        easing: EasingConfig,
    },
    /// No animation; the new variant is shown immediately
    Disabled,
}

/// Easing curve name or explicit cubic bezier control points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EasingConfig {
    Named(EasingName),
    Bezier { bezier: [f32; 4] },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EasingName {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
}

/// Named springs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpringPreset {
    Gentle,
    Quick,
    Bouncy,
    Slow,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width offered to the root node
    pub width: f32,
    /// Viewport height offered to the root node
    pub height: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub filter: String,
}

fn default_damping_ratio() -> f32 {
    0.75
}

fn default_stiffness() -> f32 {
    100.0
}

fn default_mass() -> f32 {
    1.0
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::Spring {
            damping_ratio: default_damping_ratio(),
            stiffness: default_stiffness(),
            delay_ms: 0.0,
        }
    }
}

impl Default for EasingConfig {
    fn default() -> Self {
        Self::Named(EasingName::Ease)
    }
}

impl Default for TransitionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default: TimingConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl RuneConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_TRANSITIONS") {
            self.transitions.enabled = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(filter) = std::env::var("RUNE_LOG") {
            self.logging.filter = filter;
        }
        if let Ok(val) = std::env::var("RUNE_VIEWPORT") {
            if let Some((width, height)) = val.split_once('x') {
                if let (Ok(width), Ok(height)) = (width.trim().parse(), height.trim().parse()) {
                    self.layout.width = width;
                    self.layout.height = height;
                }
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert!(config.transitions.enabled);
        assert!(matches!(
            config.transitions.default,
            TimingConfig::Spring { stiffness, .. } if stiffness == 100.0
        ));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = RuneConfig::default();
        config.transitions.overrides.insert(
            "Toggle".to_string(),
            TimingConfig::Tween {
                duration_ms: 120.0,
                delay_ms: 0.0,
                easing: EasingConfig::Bezier {
                    bezier: [0.4, 0.0, 0.2, 1.0],
                },
            },
        );
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = RuneConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_overrides() {
        let config = RuneConfig::from_toml_str(
            r#"
            [transitions]
            enabled = true

            [transitions.default]
            type = "tween"
            duration_ms = 250.0
            easing = "ease_out"

            [transitions.overrides.Toggle]
            type = "disabled"

            [transitions.overrides.Gauge]
            type = "spring"
            stiffness = 300.0

            [layout]
            width = 800.0
            height = 600.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.transitions.default,
            TimingConfig::Tween {
                duration_ms: 250.0,
                delay_ms: 0.0,
                easing: EasingConfig::Named(EasingName::EaseOut),
            }
        );
        assert_eq!(
            config.transitions.overrides.get("Toggle"),
            Some(&TimingConfig::Disabled)
        );
        assert_eq!(
            config.transitions.overrides.get("Gauge"),
            Some(&TimingConfig::Spring {
                damping_ratio: 0.75,
                stiffness: 300.0,
                delay_ms: 0.0,
            })
        );
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_parse_springs_and_back_easing() {
        let config = RuneConfig::from_toml_str(
            r#"
            [transitions.default]
            type = "spring_preset"
            preset = "bouncy"

            [transitions.overrides.Card]
            type = "custom_spring"
            stiffness = 250.0
            damping = 18.0
            delay_ms = 40.0

            [transitions.overrides.Sheet]
            type = "tween"
            duration_ms = 300.0
            easing = "ease_in_out_back"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.transitions.default,
            TimingConfig::SpringPreset {
                preset: SpringPreset::Bouncy,
                delay_ms: 0.0,
            }
        );
        assert_eq!(
            config.transitions.overrides.get("Card"),
            Some(&TimingConfig::CustomSpring {
                mass: 1.0,
                stiffness: 250.0,
                damping: 18.0,
                delay_ms: 40.0,
            })
        );
        assert_eq!(
            config.transitions.overrides.get("Sheet"),
            Some(&TimingConfig::Tween {
                duration_ms: 300.0,
                delay_ms: 0.0,
                easing: EasingConfig::Named(EasingName::EaseInOutBack),
            })
        );
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = RuneConfig::from_toml_str("[transitions]\nenabled = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = RuneConfig::load_from_file("definitely/not/here/rune.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_TRANSITIONS", "false");
            std::env::set_var("RUNE_VIEWPORT", "1024x768");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert!(!config.transitions.enabled);
        assert_eq!(config.layout.width, 1024.0);
        assert_eq!(config.layout.height, 768.0);

        unsafe {
            std::env::remove_var("RUNE_TRANSITIONS");
            std::env::remove_var("RUNE_VIEWPORT");
        }
    }
}
