//! Metric estimation and aggregation.
//!
//! Each metric is a `MetricProvider` registered by `MetricId`; the
//! aggregation driver resolves providers one by one, skipping (with a
//! warning) any metric whose estimation fails, so a single bad metric
//! never aborts the batch.

mod amplitude;
mod stats;
mod table;
mod timing;
mod velocity;
mod width;

pub use stats::SummaryStats;
pub use table::{AggregateTable, ColumnKey, PerTwitchTable};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::config::MetricsConfig;
use crate::config::TwitchConfig;
use crate::detect::{TwitchRecords, find_twitch_records};
use crate::error::Result;
use crate::trace::Trace;

use self::amplitude::{AmplitudeMetric, AreaUnderCurveMetric, FractionOfMaxMetric};
use self::timing::{
    FrequencyMetric, IrregularityMetric, PeakTimeMetric, PeakToBaselineMetric, PeriodMetric,
};
use self::velocity::VelocityMetric;
use self::width::WidthMetric;

/// Stable identifier for one named metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricId {
    Amplitude,
    FractionOfMaxAmplitude,
    AreaUnderCurve,
    Width,
    ContractionVelocity,
    RelaxationVelocity,
    Irregularity,
    Period,
    Frequency,
    ContractionTime,
    RelaxationTime,
    BaselineToPeak,
    PeakToBaseline,
}

impl MetricId {
    /// Every registered metric, in canonical order.
    pub const ALL: [MetricId; 13] = [
        MetricId::Amplitude,
        MetricId::FractionOfMaxAmplitude,
        MetricId::AreaUnderCurve,
        MetricId::Width,
        MetricId::ContractionVelocity,
        MetricId::RelaxationVelocity,
        MetricId::Irregularity,
        MetricId::Period,
        MetricId::Frequency,
        MetricId::ContractionTime,
        MetricId::RelaxationTime,
        MetricId::BaselineToPeak,
        MetricId::PeakToBaseline,
    ];
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricId::Amplitude => "amplitude",
            MetricId::FractionOfMaxAmplitude => "fraction of max amplitude",
            MetricId::AreaUnderCurve => "area under curve",
            MetricId::Width => "twitch width",
            MetricId::ContractionVelocity => "contraction velocity",
            MetricId::RelaxationVelocity => "relaxation velocity",
            MetricId::Irregularity => "interval irregularity",
            MetricId::Period => "twitch period",
            MetricId::Frequency => "twitch frequency",
            MetricId::ContractionTime => "contraction time",
            MetricId::RelaxationTime => "relaxation time",
            MetricId::BaselineToPeak => "baseline to peak",
            MetricId::PeakToBaseline => "peak to baseline",
        };
        f.write_str(name)
    }
}

/// Per-twitch values produced by one provider, in record order.
#[derive(Debug, Clone)]
pub enum Estimate {
    /// One value per twitch
    Scalar(Vec<Option<f64>>),
    /// One value per twitch per width percentage
    ByWidth(BTreeMap<u32, Vec<Option<f64>>>),
}

/// Capability interface implemented once per metric.
///
/// `estimate` may fail (metric unavailable) without aborting the batch;
/// the populate methods own the column layout for the metric and have
/// default implementations covering both estimate shapes.
pub trait MetricProvider {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate>;

    fn populate_per_twitch(&self, table: &mut PerTwitchTable, metric: MetricId, estimate: &Estimate) {
        match estimate {
            Estimate::Scalar(values) => {
                table.insert_column(ColumnKey::scalar(metric), values.clone());
            }
            Estimate::ByWidth(by_width) => {
                for (&percent, values) in by_width {
                    table.insert_column(ColumnKey::with_width(metric, percent), values.clone());
                }
            }
        }
    }

    fn populate_aggregate(&self, table: &mut AggregateTable, metric: MetricId, estimate: &Estimate) {
        match estimate {
            Estimate::Scalar(values) => {
                table.insert_column(
                    ColumnKey::scalar(metric),
                    SummaryStats::from_values(values, self.rounded()),
                );
            }
            Estimate::ByWidth(by_width) => {
                for (&percent, values) in by_width {
                    table.insert_column(
                        ColumnKey::with_width(metric, percent),
                        SummaryStats::from_values(values, self.rounded()),
                    );
                }
            }
        }
    }

    /// Round aggregate statistics to whole numbers
    fn rounded(&self) -> bool {
        false
    }
}

/// Resolve the provider implementing `metric`.
pub fn create_provider(metric: MetricId, config: &MetricsConfig) -> Box<dyn MetricProvider> {
    match metric {
        MetricId::Amplitude => Box::new(AmplitudeMetric::new(config)),
        MetricId::FractionOfMaxAmplitude => Box::new(FractionOfMaxMetric::new(config)),
        MetricId::AreaUnderCurve => Box::new(AreaUnderCurveMetric::new(config)),
        MetricId::Width => Box::new(WidthMetric::new(config)),
        MetricId::ContractionVelocity => Box::new(VelocityMetric::contraction(config)),
        MetricId::RelaxationVelocity => Box::new(VelocityMetric::relaxation(config)),
        MetricId::Irregularity => Box::new(IrregularityMetric::new(config)),
        MetricId::Period => Box::new(PeriodMetric::new(config)),
        MetricId::Frequency => Box::new(FrequencyMetric::new(config)),
        MetricId::ContractionTime => Box::new(PeakTimeMetric::contraction(config)),
        MetricId::RelaxationTime => Box::new(PeakTimeMetric::relaxation(config)),
        MetricId::BaselineToPeak => Box::new(PeakToBaselineMetric::contraction(config)),
        MetricId::PeakToBaseline => Box::new(PeakToBaselineMetric::relaxation(config)),
    }
}

/// Sequence detected peaks/valleys into twitches and fill both output
/// tables with the requested metrics.
///
/// Sequencing failures are fatal for the run; individual metric failures
/// are logged and that metric's columns are simply absent from both
/// tables. When the waveform points downward
/// (`config.detection.twitches_point_up` false), the amplitude row is
/// inverted before estimation so amplitude-family metrics stay positive.
///
/// # Arguments
/// * `peak_indices` - Detected contraction indices, ascending
/// * `valley_indices` - Detected relaxation indices, ascending
/// * `trace` - The trace the indices point into
/// * `requested` - Metrics to compute (e.g. `&MetricId::ALL`)
/// * `config` - Engine configuration
pub fn compute_metrics(
    peak_indices: &[usize],
    valley_indices: &[usize],
    trace: &Trace,
    requested: &[MetricId],
    config: &TwitchConfig,
) -> Result<(PerTwitchTable, AggregateTable)> {
    let records = find_twitch_records(peak_indices, valley_indices)?;

    let oriented: Trace;
    let trace = if config.detection.twitches_point_up {
        trace
    } else {
        oriented = trace.inverted();
        &oriented
    };

    let mut per_twitch = PerTwitchTable::new(records.peak_indices());
    let mut aggregate = AggregateTable::default();

    for &metric in requested {
        let provider = create_provider(metric, &config.metrics);
        match provider.estimate(&records, trace) {
            Ok(estimate) => {
                provider.populate_per_twitch(&mut per_twitch, metric, &estimate);
                provider.populate_aggregate(&mut aggregate, metric, &estimate);
            }
            Err(err) => log::warn!("skipping metric: {err}"),
        }
    }

    Ok((per_twitch, aggregate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_display_is_unique() {
        let mut names: Vec<String> = MetricId::ALL.iter().map(|m| m.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), MetricId::ALL.len());
    }

    #[test]
    fn test_registry_covers_all_metrics() {
        let config = MetricsConfig::default();
        for metric in MetricId::ALL {
            // resolving must not panic for any registered identifier
            let _ = create_provider(metric, &config);
        }
    }
}
