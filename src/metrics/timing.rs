//! Timing metrics: period, frequency, interval irregularity, time from
//! width crossings to the peak, and full contraction/relaxation time.

use std::collections::BTreeMap;

use crate::constants::MICRO_TO_BASE_CONVERSION;
use crate::detect::TwitchRecords;
use crate::error::{Result, TwitchError};
use crate::metrics::width::calculate_twitch_widths;
use crate::metrics::{Estimate, MetricId, MetricProvider, MetricsConfig};
use crate::trace::Trace;

/// Time from each twitch peak to the next peak, in seconds. Absent for
/// the last twitch of a valley-terminated sequence.
pub struct PeriodMetric {
    rounded: bool,
}

impl PeriodMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
        }
    }

    fn periods(records: &TwitchRecords, trace: &Trace) -> Vec<Option<f64>> {
        let time = trace.time();
        records
            .iter()
            .map(|(peak, record)| {
                record
                    .subsequent_peak
                    .map(|next| (time[next] - time[peak]) / MICRO_TO_BASE_CONVERSION)
            })
            .collect()
    }
}

impl MetricProvider for PeriodMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        Ok(Estimate::Scalar(Self::periods(records, trace)))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

/// Instantaneous twitch rate: reciprocal of the period, in Hz.
pub struct FrequencyMetric {
    rounded: bool,
}

impl FrequencyMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
        }
    }
}

impl MetricProvider for FrequencyMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let frequencies = PeriodMetric::periods(records, trace)
            .into_iter()
            .map(|period| period.map(|p| 1.0 / p))
            .collect();
        Ok(Estimate::Scalar(frequencies))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

/// Absolute difference between the intervals on either side of each
/// twitch, in seconds. Absent for the first and last twitch; both still
/// count toward the aggregate `n`.
pub struct IrregularityMetric {
    rounded: bool,
}

impl IrregularityMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
        }
    }
}

impl MetricProvider for IrregularityMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let time = trace.time();
        let peaks = records.peak_indices();

        let mut values = vec![None; peaks.len()];
        for i in 1..peaks.len().saturating_sub(1) {
            let last_interval = time[peaks[i]] - time[peaks[i - 1]];
            let current_interval = time[peaks[i + 1]] - time[peaks[i]];
            values[i] = Some((current_interval - last_interval).abs() / MICRO_TO_BASE_CONVERSION);
        }
        Ok(Estimate::Scalar(values))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

/// Time between a width crossing and the peak, per configured width
/// percentage, in seconds.
///
/// The contraction variant measures from the `100 - p` percent crossing
/// on the rising side up to the peak; the relaxation variant from the
/// peak down to the `p` percent crossing on the falling side.
pub struct PeakTimeMetric {
    metric: MetricId,
    rounded: bool,
    is_contraction: bool,
    width_percentages: Vec<u32>,
}

impl PeakTimeMetric {
    pub fn contraction(config: &MetricsConfig) -> Self {
        Self {
            metric: MetricId::ContractionTime,
            rounded: config.rounded,
            is_contraction: true,
            width_percentages: config.width_percentages.clone(),
        }
    }

    pub fn relaxation(config: &MetricsConfig) -> Self {
        Self {
            metric: MetricId::RelaxationTime,
            rounded: config.rounded,
            is_contraction: false,
            width_percentages: config.width_percentages.clone(),
        }
    }

    fn lookup_percent(&self, percent: u32) -> u32 {
        if self.is_contraction {
            100 - percent
        } else {
            percent
        }
    }
}

impl MetricProvider for PeakTimeMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        // the mirrored contraction lookup needs the complement to stay in
        // range as well, so both variants require percentages in (0, 100)
        if let Some(&bad) = self.width_percentages.iter().find(|&&p| p == 0 || p >= 100) {
            return Err(TwitchError::MetricUnavailable {
                metric: self.metric,
                reason: format!("width percentage {bad} outside (0, 100)"),
            });
        }
        let lookups: Vec<u32> = self
            .width_percentages
            .iter()
            .map(|&p| self.lookup_percent(p))
            .collect();
        let coords = calculate_twitch_widths(records, trace, &lookups, self.rounded).map_err(
            |reason| TwitchError::MetricUnavailable {
                metric: self.metric,
                reason,
            },
        )?;

        let time = trace.time();
        let mut by_width = BTreeMap::new();
        for &percent in &self.width_percentages {
            let lookup = self.lookup_percent(percent);
            let values = records
                .iter()
                .map(|(peak, _)| {
                    let point = &coords[&peak][&lookup];
                    let diff = if self.is_contraction {
                        time[peak] - point.contraction.time_us
                    } else {
                        point.relaxation.time_us - time[peak]
                    };
                    Some(diff / MICRO_TO_BASE_CONVERSION)
                })
                .collect();
            by_width.insert(percent, values);
        }
        Ok(Estimate::ByWidth(by_width))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}

/// Full contraction time (prior valley to peak) or full relaxation time
/// (peak to subsequent valley), in seconds.
pub struct PeakToBaselineMetric {
    rounded: bool,
    is_contraction: bool,
}

impl PeakToBaselineMetric {
    pub fn contraction(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
            is_contraction: true,
        }
    }

    pub fn relaxation(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
            is_contraction: false,
        }
    }
}

impl MetricProvider for PeakToBaselineMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let time = trace.time();
        let values = records
            .iter()
            .map(|(peak, record)| {
                let diff = if self.is_contraction {
                    time[peak] - time[record.prior_valley]
                } else {
                    time[record.subsequent_valley] - time[peak]
                };
                Some(diff / MICRO_TO_BASE_CONVERSION)
            })
            .collect();
        Ok(Estimate::Scalar(values))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}
