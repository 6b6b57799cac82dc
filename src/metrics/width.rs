//! Twitch width evaluation.
//!
//! A twitch's width at percentage `p` is the time between the two points
//! where the signal has dropped `p` percent of the way from the peak to
//! the neighboring valley, measured separately on the rising (contraction)
//! and falling (relaxation) side. The crossing coordinates computed here
//! also anchor the amplitude, AUC, velocity, and time-to-peak metrics.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::MICRO_TO_BASE_CONVERSION;
use crate::detect::TwitchRecords;
use crate::error::{Result, TwitchError};
use crate::metrics::{Estimate, MetricId, MetricProvider, MetricsConfig};
use crate::signal::interpolate::interpolate_x_for_y;
use crate::trace::Trace;

/// One crossing point: interpolated time (µs) and the signal level there.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SideCoord {
    pub time_us: f64,
    pub level: f64,
}

/// Crossing coordinates of one twitch at one percentage.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WidthPoint {
    pub contraction: SideCoord,
    pub relaxation: SideCoord,
    pub width_us: f64,
}

/// Per-twitch, per-percentage crossing coordinates.
pub(crate) type TwitchWidthMap = BTreeMap<usize, BTreeMap<u32, WidthPoint>>;

/// Compute crossing coordinates for every twitch at every requested
/// percentage.
///
/// The rising magnitude is measured against the prior valley and the
/// falling magnitude against the subsequent valley. The outward walk
/// indices are shared across ascending percentages, so each sample is
/// visited once per twitch side. When `rounded`, crossing times, levels,
/// and width values are rounded to whole numbers.
///
/// Fails (with a plain reason, wrapped by the calling provider) when a
/// percentage lies outside (0, 100].
pub(crate) fn calculate_twitch_widths(
    records: &TwitchRecords,
    trace: &Trace,
    percents: &[u32],
    rounded: bool,
) -> std::result::Result<TwitchWidthMap, String> {
    let sorted: BTreeSet<u32> = percents.iter().copied().collect();
    if let Some(&bad) = sorted.iter().find(|&&p| p == 0 || p > 100) {
        return Err(format!("width percentage {bad} outside (0, 100]"));
    }

    let time = trace.time();
    let amplitude = trace.amplitude();
    let mut map = TwitchWidthMap::new();

    for (peak, record) in records.iter() {
        let peak_level = amplitude[peak];
        let rise_magnitude = peak_level - amplitude[record.prior_valley];
        let fall_magnitude = peak_level - amplitude[record.subsequent_valley];

        let mut rising_idx = peak - 1;
        let mut falling_idx = peak + 1;
        let mut points = BTreeMap::new();

        for &percent in &sorted {
            let fraction = percent as f64 / 100.0;
            let rising_threshold = peak_level - fraction * rise_magnitude;
            let falling_threshold = peak_level - fraction * fall_magnitude;

            // walk outward until each side drops below its threshold; the
            // valley bounds both walks because p <= 100
            while amplitude[rising_idx] > rising_threshold {
                rising_idx -= 1;
            }
            while amplitude[falling_idx] > falling_threshold {
                falling_idx += 1;
            }

            let mut rising_time = interpolate_x_for_y(
                rising_threshold,
                time[rising_idx],
                amplitude[rising_idx],
                time[rising_idx + 1],
                amplitude[rising_idx + 1],
            );
            let mut falling_time = interpolate_x_for_y(
                falling_threshold,
                time[falling_idx],
                amplitude[falling_idx],
                time[falling_idx - 1],
                amplitude[falling_idx - 1],
            );

            let mut width_us = falling_time - rising_time;
            let mut rising_level = rising_threshold;
            let mut falling_level = falling_threshold;
            if rounded {
                width_us = width_us.round();
                rising_time = rising_time.round();
                falling_time = falling_time.round();
                rising_level = rising_level.round();
                falling_level = falling_level.round();
            }

            points.insert(
                percent,
                WidthPoint {
                    contraction: SideCoord {
                        time_us: rising_time,
                        level: rising_level,
                    },
                    relaxation: SideCoord {
                        time_us: falling_time,
                        level: falling_level,
                    },
                    width_us,
                },
            );
        }
        map.insert(peak, points);
    }

    Ok(map)
}

/// Twitch width at each configured percentage, in seconds.
pub struct WidthMetric {
    rounded: bool,
    width_percentages: Vec<u32>,
}

impl WidthMetric {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            rounded: config.rounded,
            width_percentages: config.width_percentages.clone(),
        }
    }
}

impl MetricProvider for WidthMetric {
    fn estimate(&self, records: &TwitchRecords, trace: &Trace) -> Result<Estimate> {
        let coords = calculate_twitch_widths(records, trace, &self.width_percentages, self.rounded)
            .map_err(|reason| TwitchError::MetricUnavailable {
                metric: MetricId::Width,
                reason,
            })?;

        let mut by_width = BTreeMap::new();
        for (peak, _) in records.iter() {
            for (&percent, point) in &coords[&peak] {
                by_width
                    .entry(percent)
                    .or_insert_with(Vec::new)
                    .push(Some(point.width_us / MICRO_TO_BASE_CONVERSION));
            }
        }
        // no twitches: still report the requested columns, empty
        for &percent in &self.width_percentages {
            by_width.entry(percent).or_insert_with(Vec::new);
        }
        Ok(Estimate::ByWidth(by_width))
    }

    fn rounded(&self) -> bool {
        self.rounded
    }
}
