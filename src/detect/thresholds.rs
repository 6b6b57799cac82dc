//! Derivation of extrema-search constraints from the trace geometry.

use crate::config::FactorPair;
use crate::constants::MICRO_TO_BASE_CONVERSION;
use crate::error::{Result, TwitchError};
use crate::signal::ExtremaConstraints;

/// Search constraints for the peak and valley passes, derived from the
/// sampling period, a maximum plausible twitch frequency, and the signal
/// amplitude range.
#[derive(Debug, Clone, Copy)]
pub struct DetectionThresholds {
    /// Minimum sample distance between twitches
    pub min_distance: usize,
    /// Constraints for the peak search
    pub peak: ExtremaConstraints,
    /// Constraints for the valley search
    pub valley: ExtremaConstraints,
}

impl DetectionThresholds {
    /// Derive thresholds for one detection run.
    ///
    /// `min_distance` is the sample count spanned by one period of the
    /// fastest plausible twitch; prominence thresholds divide the
    /// amplitude range by the prominence factors, width thresholds divide
    /// `min_distance` by the width factors.
    ///
    /// # Arguments
    /// * `sampling_period_us` - Time between consecutive samples in microseconds
    /// * `max_frequency` - Fastest plausible twitch rate in events/second
    /// * `amplitude_range` - Max minus min of the windowed signal
    /// * `prominence_factors` - (peak, valley) prominence divisors
    /// * `width_factors` - (peak, valley) width divisors
    pub fn derive(
        sampling_period_us: f64,
        max_frequency: f64,
        amplitude_range: f64,
        prominence_factors: FactorPair,
        width_factors: FactorPair,
    ) -> Result<Self> {
        if sampling_period_us <= 0.0 {
            return Err(TwitchError::Config(format!(
                "sampling period must be positive, got {sampling_period_us}"
            )));
        }
        for (name, factor) in [
            ("prominence", prominence_factors.peak),
            ("prominence", prominence_factors.valley),
            ("width", width_factors.peak),
            ("width", width_factors.valley),
        ] {
            if factor <= 0.0 {
                return Err(TwitchError::Config(format!(
                    "{name} factors must be positive, got {factor}"
                )));
            }
        }

        let min_distance = ((1.0 / max_frequency) * MICRO_TO_BASE_CONVERSION / sampling_period_us)
            .round()
            .max(1.0) as usize;

        let side = |prominence_factor: f64, width_factor: f64| ExtremaConstraints {
            min_distance,
            min_prominence: amplitude_range / prominence_factor,
            min_width: min_distance as f64 / width_factor,
        };

        Ok(Self {
            min_distance,
            peak: side(prominence_factors.peak, width_factors.peak),
            valley: side(prominence_factors.valley, width_factors.valley),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TWITCH_FREQUENCY;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_distance_from_max_frequency() {
        // 10 ms sampling period at 7 events/sec: round(14.29) = 14 samples
        let thresholds = DetectionThresholds::derive(
            10_000.0,
            MAX_TWITCH_FREQUENCY,
            1.0,
            6.0.into(),
            7.0.into(),
        )
        .unwrap();
        assert_eq!(thresholds.min_distance, 14);
    }

    #[test]
    fn test_prominence_and_width_scaling() {
        let thresholds =
            DetectionThresholds::derive(10_000.0, 7.0, 12.0, (6.0, 4.0).into(), (7.0, 2.0).into())
                .unwrap();
        assert_relative_eq!(thresholds.peak.min_prominence, 2.0);
        assert_relative_eq!(thresholds.valley.min_prominence, 3.0);
        assert_relative_eq!(thresholds.peak.min_width, 2.0);
        assert_relative_eq!(thresholds.valley.min_width, 7.0);
    }

    #[test]
    fn test_rejects_non_positive_sampling_period() {
        assert!(DetectionThresholds::derive(0.0, 7.0, 1.0, 6.0.into(), 7.0.into()).is_err());
        assert!(DetectionThresholds::derive(-5.0, 7.0, 1.0, 6.0.into(), 7.0.into()).is_err());
    }

    #[test]
    fn test_rejects_non_positive_factors() {
        assert!(DetectionThresholds::derive(10_000.0, 7.0, 1.0, 0.0.into(), 7.0.into()).is_err());
        assert!(
            DetectionThresholds::derive(10_000.0, 7.0, 1.0, 6.0.into(), (7.0, -1.0).into())
                .is_err()
        );
    }

    #[test]
    fn test_min_distance_clamped_to_one_sample() {
        // Coarse sampling: one period of the fastest twitch is under a sample
        let thresholds =
            DetectionThresholds::derive(1_000_000.0, 7.0, 1.0, 6.0.into(), 7.0.into()).unwrap();
        assert_eq!(thresholds.min_distance, 1);
    }
}
