//! Contraction and relaxation velocity.

use std::collections::BTreeSet;

use crate::constants::MICRO_TO_BASE_CONVERSION;
use crate::detect::TwitchRecords;
use crate::error::{Result, TwitchError};
use crate::metrics::width::calculate_twitch_widths;
use crate::metrics::{Estimate, MetricId, MetricProvider, MetricsConfig};
use crate::trace::Trace;

/// Mean slope of one side of the twitch, in amplitude units per second.
///
/// Measured between the side's crossing at the configured baseline
/// percentage and its crossing near the peak (90% for contraction, 10%
/// for relaxation).
pub struct VelocityMetric {
    metric: MetricId,
    rounded: bool,
    is_contraction: bool,
    baseline_widths: (u32, u32),
}

impl VelocityMetric {
    pub fn contraction(config: &MetricsConfig) -> Self {
        Self {
            metric: MetricId::ContractionVelocity,
            rounded: config.rounded,
            is_contraction: true,
            baseline_widths: config.baseline_widths,
        }
    }

    pub fn relaxation(config: &MetricsConfig) -> Self {
        Self {
            metric: MetricId::RelaxationVelocity,
            rounded: config.rounded,
            is_contraction: false,
            baseline_widths: config.baseline_widths,
        }
    }
}

impl MetricProvider for VelocityMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let (base, top) = if self.is_contraction {
            (self.baseline_widths.0, 90)
        } else {
            (self.baseline_widths.1, 10)
        };

        // the 10/90 anchors are always needed alongside the baseline pair
        let percents: BTreeSet<u32> = [self.baseline_widths.0, self.baseline_widths.1, 10, 90]
            .into_iter()
            .collect();
        let percents: Vec<u32> = percents.into_iter().collect();

        let coords = calculate_twitch_widths(records, trace, &percents, self.rounded).map_err(
            |reason| TwitchError::MetricUnavailable {
                metric: self.metric,
                reason,
            },
        )?;

        let mut velocities = Vec::with_capacity(records.len());
        for (peak, _) in records.iter() {
            let points = &coords[&peak];
            let (start, end) = if self.is_contraction {
                (points[&base].contraction, points[&top].contraction)
            } else {
                (points[&base].relaxation, points[&top].relaxation)
            };

            let velocity = ((end.level - start.level) / (end.time_us - start.time_us)).abs()
                * MICRO_TO_BASE_CONVERSION;
            velocities.push(Some(velocity));
        }
        Ok(Estimate::Scalar(velocities))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricsConfig;
    use crate::detect::find_twitch_records;
    use approx::assert_relative_eq;

    /// One triangular twitch rising 1 amplitude unit per 10 ms.
    fn trace_with_unit_slopes() -> (Trace, TwitchRecords) {
        let n = 17;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 10_000.0).collect();
        let amplitude: Vec<f64> = (0..n).map(|i| 8.0 - (i as f64 - 8.0).abs()).collect();
        let trace = Trace::new(time, amplitude).unwrap();
        let records = find_twitch_records(&[8], &[0, 16]).unwrap();
        (trace, records)
    }

    #[test]
    fn test_velocity_of_unit_slope() {
        let (trace, records) = trace_with_unit_slopes();
        let config = MetricsConfig::default();

        for metric in [
            VelocityMetric::contraction(&config),
            VelocityMetric::relaxation(&config),
        ] {
            let estimate = metric.estimate(&records, &trace).unwrap();
            match estimate {
                Estimate::Scalar(values) => {
                    // 1 amplitude unit per 10 ms on both sides
                    assert_relative_eq!(values[0].unwrap(), 100.0, epsilon = 1e-9);
                }
                _ => panic!("expected scalar estimate"),
            }
        }
    }
}
