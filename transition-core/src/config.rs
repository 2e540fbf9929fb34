//! Serializable detection configuration.
//!
//! Built fresh by the caller for each call and never retained by the engine.
//! Deserialization goes through `RawDetectionConfig`, whose durations are
//! signed, so a negative duration in a config file is reported as
//! `InvalidInput` rather than being clamped or surfacing as a type error.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DetectError;

/// Which detection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Exact unit steps of the first difference. Input must already be two-level.
    ThresholdDiff,
    /// Strict local maxima (off→on) and minima (on→off).
    Peak,
    /// Penalized optimal segmentation (PELT) with mean-shift cost.
    ChangePoint,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThresholdDiff => "threshold_diff",
            Self::Peak => "peak",
            Self::ChangePoint => "change_point",
        }
    }
}

/// Tuning for the change-point strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangePointParams {
    /// Cost added per segment boundary. Larger values suppress weak shifts.
    pub penalty: f64,
    /// Fewest samples a segment may hold.
    pub min_segment_len: usize,
    /// Longest signal accepted. The exact search is quadratic in the worst case.
    pub max_signal_len: usize,
}

impl Default for ChangePointParams {
    fn default() -> Self {
        Self {
            penalty: 1.0,
            min_segment_len: 2,
            max_signal_len: 100_000,
        }
    }
}

/// Complete configuration for one detection call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetectionConfig")]
pub struct DetectionConfig {
    pub strategy: StrategyKind,
    /// Minimum gap, in samples, between retained off→on transitions. 0 disables.
    pub off_to_on_min_duration: usize,
    /// Minimum gap, in samples, between retained on→off transitions. 0 disables.
    pub on_to_off_min_duration: usize,
    pub change_point: ChangePointParams,
}

impl DetectionConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            off_to_on_min_duration: 0,
            on_to_off_min_duration: 0,
            change_point: ChangePointParams::default(),
        }
    }

    pub fn with_min_durations(mut self, off_to_on: usize, on_to_off: usize) -> Self {
        self.off_to_on_min_duration = off_to_on;
        self.on_to_off_min_duration = on_to_off;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.change_point.penalty = penalty;
        self
    }

    pub fn with_min_segment_len(mut self, min_segment_len: usize) -> Self {
        self.change_point.min_segment_len = min_segment_len;
        self
    }

    pub fn with_max_signal_len(mut self, max_signal_len: usize) -> Self {
        self.change_point.max_signal_len = max_signal_len;
        self
    }

    /// Check every value against its domain.
    pub fn validate(&self) -> Result<(), DetectError> {
        let cp = &self.change_point;
        if !cp.penalty.is_finite() || cp.penalty <= 0.0 {
            return Err(DetectError::invalid(format!(
                "change point penalty must be a positive finite number, got {}",
                cp.penalty
            )));
        }
        if cp.min_segment_len == 0 {
            return Err(DetectError::invalid("min_segment_len must be >= 1"));
        }
        if cp.max_signal_len == 0 {
            return Err(DetectError::invalid("max_signal_len must be >= 1"));
        }
        Ok(())
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DetectError> {
        let content = std::fs::read_to_string(path).map_err(|source| DetectError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from a TOML string.
    ///
    /// ```toml
    /// strategy = "change_point"
    /// off_to_on_min_duration = 5
    ///
    /// [change_point]
    /// penalty = 4.0
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, DetectError> {
        let raw: RawDetectionConfig = toml::from_str(content)?;
        Self::try_from(raw)
    }
}

/// Wire form of `DetectionConfig` prior to domain checks.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetectionConfig {
    strategy: StrategyKind,
    #[serde(default)]
    off_to_on_min_duration: i64,
    #[serde(default)]
    on_to_off_min_duration: i64,
    #[serde(default)]
    change_point: ChangePointParams,
}

impl TryFrom<RawDetectionConfig> for DetectionConfig {
    type Error = DetectError;

    fn try_from(raw: RawDetectionConfig) -> Result<Self, Self::Error> {
        let off_to_on_min_duration =
            non_negative("off_to_on_min_duration", raw.off_to_on_min_duration)?;
        let on_to_off_min_duration =
            non_negative("on_to_off_min_duration", raw.on_to_off_min_duration)?;
        let config = Self {
            strategy: raw.strategy,
            off_to_on_min_duration,
            on_to_off_min_duration,
            change_point: raw.change_point,
        };
        config.validate()?;
        Ok(config)
    }
}

fn non_negative(field: &str, value: i64) -> Result<usize, DetectError> {
    usize::try_from(value)
        .map_err(|_| DetectError::invalid(format!("{field} must be >= 0, got {value}")))
}
