//! Amplitude-family metrics: twitch amplitude, fraction of the maximum
//! amplitude, and area under the curve.
//!
//! All three measure against the twitch baseline: the line through the
//! contraction crossing at `100 - baseline_widths.0` percent and the
//! relaxation crossing at `baseline_widths.1` percent.

use crate::constants::MICRO_TO_BASE_CONVERSION;
use crate::detect::TwitchRecords;
use crate::error::{Result, TwitchError};
use crate::metrics::width::calculate_twitch_widths;
use crate::metrics::{Estimate, MetricId, MetricProvider, MetricsConfig};
use crate::signal::interpolate::interpolate_y_for_x;
use crate::signal::time_window_indices;
use crate::trace::Trace;

/// Baseline anchor percentages as width-map keys: the contraction anchor
/// is measured `baseline_widths.0` percent up from the prior valley.
fn baseline_percents(baseline_widths: (u32, u32)) -> (u32, u32) {
    (100 - baseline_widths.0, baseline_widths.1)
}

fn calculate_amplitudes(
    records: &TwitchRecords,
    trace: &Trace,
    baseline: (u32, u32),
    rounded: bool,
) -> std::result::Result<Vec<Option<f64>>, String> {
    let coords = calculate_twitch_widths(records, trace, &[baseline.0, baseline.1], rounded)?;

    let mut amplitudes = Vec::with_capacity(records.len());
    for (peak, _) in records.iter() {
        let peak_time = trace.time()[peak];
        let peak_level = trace.amplitude()[peak];

        let contraction = coords[&peak][&baseline.0].contraction;
        let relaxation = coords[&peak][&baseline.1].relaxation;
        let base_level = interpolate_y_for_x(
            peak_time,
            contraction.time_us,
            contraction.level,
            relaxation.time_us,
            relaxation.level,
        );
        amplitudes.push(Some(peak_level - base_level));
    }
    Ok(amplitudes)
}

/// Mean height of the peak above the twitch baseline.
pub struct AmplitudeMetric {
    rounded: bool,
    baseline: (u32, u32),
}

impl AmplitudeMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
            baseline: baseline_percents(config.baseline_widths),
        }
    }
}

impl MetricProvider for AmplitudeMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        calculate_amplitudes(records, trace, self.baseline, self.rounded)
            .map(Estimate::Scalar)
            .map_err(|reason| TwitchError::MetricUnavailable {
                metric: MetricId::Amplitude,
                reason,
            })
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

/// Twitch amplitude as a fraction of the largest amplitude in the run.
/// Never rounded.
pub struct FractionOfMaxMetric {
    baseline: (u32, u32),
}

impl FractionOfMaxMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            baseline: baseline_percents(config.baseline_widths),
        }
    }
}

impl MetricProvider for FractionOfMaxMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let amplitudes = calculate_amplitudes(records, trace, self.baseline, false).map_err(
            |reason| TwitchError::MetricUnavailable {
                metric: MetricId::FractionOfMaxAmplitude,
                reason,
            },
        )?;

        let max = amplitudes
            .iter()
            .filter_map(|v| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        let fractions = amplitudes
            .into_iter()
            .map(|v| v.map(|amplitude| amplitude / max))
            .collect();
        Ok(Estimate::Scalar(fractions))
    }
}

/// Area between the signal and zero over the twitch's baseline span, in
/// amplitude-seconds (trapezoidal rule).
pub struct AreaUnderCurveMetric {
    rounded: bool,
    baseline: (u32, u32),
}

impl AreaUnderCurveMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
            baseline: baseline_percents(config.baseline_widths),
        }
    }
}

impl MetricProvider for AreaUnderCurveMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let coords = calculate_twitch_widths(
            records,
            trace,
            &[self.baseline.0, self.baseline.1],
            self.rounded,
        )
        .map_err(|reason| TwitchError::MetricUnavailable {
            metric: MetricId::AreaUnderCurve,
            reason,
        })?;

        let dx_seconds = trace.sampling_period() / MICRO_TO_BASE_CONVERSION;
        let mut areas = Vec::with_capacity(records.len());
        for (peak, _) in records.iter() {
            let start = coords[&peak][&self.baseline.0].contraction.time_us;
            let stop = coords[&peak][&self.baseline.1].relaxation.time_us;
            let window = time_window_indices(trace.time(), start, stop);

            let mut area = trapezoid(&trace.amplitude()[window], dx_seconds);
            if self.rounded {
                area = area.round();
            }
            areas.push(Some(area));
        }
        Ok(Estimate::Scalar(areas))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

fn trapezoid(values: &[f64], dx: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    dx * (sum - (values[0] + values[values.len() - 1]) / 2.0)
}
