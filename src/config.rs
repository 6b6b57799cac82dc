//! Configuration for twitch detection and metric aggregation.
//!
//! All options are plain data with sensible defaults; construct with
//! `TwitchConfig::default()` and override fields as needed:
//!
//! ```
//! use myotwitch::config::TwitchConfig;
//!
//! let mut config = TwitchConfig::default();
//! config.detection.twitches_point_up = false;
//! config.metrics.rounded = true;
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASELINE_WIDTHS, DEFAULT_PROMINENCE_FACTORS, DEFAULT_TWITCH_WIDTH_PERCENTS,
    DEFAULT_WIDTH_FACTORS,
};

/// A (peak, valley) scaling-factor pair.
///
/// Detection thresholds are derived separately for peaks and valleys; a
/// single scalar applies the same factor to both sides.
///
/// # Example
/// ```
/// use myotwitch::config::FactorPair;
///
/// let same: FactorPair = 6.0.into();
/// assert_eq!(same.peak, same.valley);
///
/// let split: FactorPair = (6.0, 8.0).into();
/// assert_eq!(split.valley, 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorPair {
    /// Factor applied when searching for peaks
    pub peak: f64,
    /// Factor applied when searching for valleys
    pub valley: f64,
}

impl FactorPair {
    pub fn new(peak: f64, valley: f64) -> Self {
        Self { peak, valley }
    }
}

impl From<f64> for FactorPair {
    fn from(factor: f64) -> Self {
        Self::new(factor, factor)
    }
}

impl From<(f64, f64)> for FactorPair {
    fn from((peak, valley): (f64, f64)) -> Self {
        Self::new(peak, valley)
    }
}

/// Top-level engine configuration
///
/// Groups the detection-side and metrics-side options. One configuration
/// value serves both `detect_twitches` and `compute_metrics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// Peak/valley detection configuration
    pub detection: DetectionConfig,
    /// Metric estimation and aggregation configuration
    pub metrics: MetricsConfig,
}

/// Peak/valley detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Whether twitch events point upward in the trace. When false the
    /// waveform is inverted before peak search.
    pub twitches_point_up: bool,
    /// Start of the analysis window in microseconds
    pub start_time: f64,
    /// End of the analysis window in microseconds (infinite = whole trace)
    pub end_time: f64,
    /// Divisors applied to the amplitude range to obtain the minimum
    /// (peak, valley) prominence
    pub prominence_factors: FactorPair,
    /// Divisors applied to the minimum twitch distance to obtain the
    /// minimum (peak, valley) width in samples
    pub width_factors: FactorPair,
}

/// Metric estimation and aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Round metric values and statistics to whole numbers
    pub rounded: bool,
    /// Width percentages evaluated by width-family metrics
    pub width_percentages: Vec<u32>,
    /// (contraction, relaxation) percentages anchoring the twitch baseline
    pub baseline_widths: (u32, u32),
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            twitches_point_up: true,
            start_time: 0.0,
            end_time: f64::INFINITY,
            prominence_factors: DEFAULT_PROMINENCE_FACTORS.into(),
            width_factors: DEFAULT_WIDTH_FACTORS.into(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            rounded: false,
            width_percentages: DEFAULT_TWITCH_WIDTH_PERCENTS.to_vec(),
            baseline_widths: DEFAULT_BASELINE_WIDTHS,
        }
    }
}
