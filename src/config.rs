use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::target::TargetParams;
use crate::analysis::Axis;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BREW_LENS_CONFIG";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Analysis settings read from `config.json`. Every field is optional,
/// including each half of a per-axis fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAnalysisConfig")]
pub struct AnalysisConfig {
    /// Axis shown when a log is opened.
    pub default_axis: Axis,
    pub ratio: AxisFallback,
    pub brew_time: AxisFallback,
    pub target: TargetParams,
}

/// Target and band used when there is not enough data on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisFallback {
    pub target: f64,
    pub band_width: f64,
}

/// On-disk shape: fallbacks may name only the fields they override.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAnalysisConfig {
    default_axis: Axis,
    ratio: FallbackOverride,
    brew_time: FallbackOverride,
    target: TargetParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FallbackOverride {
    target: Option<f64>,
    band_width: Option<f64>,
}

impl FallbackOverride {
    fn over(self, base: AxisFallback) -> AxisFallback {
        AxisFallback {
            target: self.target.unwrap_or(base.target),
            band_width: self.band_width.unwrap_or(base.band_width),
        }
    }
}

impl From<RawAnalysisConfig> for AnalysisConfig {
    fn from(raw: RawAnalysisConfig) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            default_axis: raw.default_axis,
            ratio: raw.ratio.over(defaults.ratio),
            brew_time: raw.brew_time.over(defaults.brew_time),
            target: raw.target,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_axis: Axis::Ratio,
            ratio: AxisFallback {
                target: 2.0,
                band_width: 0.5,
            },
            brew_time: AxisFallback {
                target: 28.0,
                band_width: 5.0,
            },
            target: TargetParams::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{axis:?} fallback {field} must be finite and non-negative, got {value}")]
    BadFallback {
        axis: Axis,
        field: &'static str,
        value: f64,
    },
    #[error("target.{field} must be within [0, 1], got {value}")]
    BadQuantile { field: &'static str, value: f64 },
    #[error("target.band_low ({low}) must not exceed target.band_high ({high})")]
    InvertedBand { low: f64, high: f64 },
}

impl AnalysisConfig {
    pub fn fallback(&self, axis: Axis) -> AxisFallback {
        match axis {
            Axis::Ratio => self.ratio,
            Axis::BrewTime => self.brew_time,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for axis in Axis::ALL {
            let fb = self.fallback(axis);
            for (field, value) in [("target", fb.target), ("band_width", fb.band_width)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::BadFallback { axis, field, value });
                }
            }
        }
        let t = &self.target;
        for (field, value) in [
            ("top_quantile", t.top_quantile),
            ("band_low", t.band_low),
            ("band_high", t.band_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BadQuantile { field, value });
            }
        }
        if t.band_low > t.band_high {
            return Err(ConfigError::InvertedBand {
                low: t.band_low,
                high: t.band_high,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from a JSON file.  Returns `AnalysisConfig::default()`
/// if the file doesn't exist.
pub fn load(path: impl AsRef<Path>) -> Result<AnalysisConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(AnalysisConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config '{}'", path.display()))?;
    Ok(config)
}

/// `$BREW_LENS_CONFIG`, else `$XDG_CONFIG_HOME/brew-lens/config.json`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("brew-lens").join("config.json")
}
