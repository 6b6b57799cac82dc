//! Twitch detection: windowing, constrained extrema location, and valley
//! repair.

pub mod dedup;
pub mod sequence;
pub mod thresholds;

pub use dedup::dedup_valleys;
pub use sequence::{TwitchRecord, TwitchRecords, find_twitch_records};
pub use thresholds::DetectionThresholds;

use std::ops::Range;

use crate::config::TwitchConfig;
use crate::constants::MAX_TWITCH_FREQUENCY;
use crate::error::{Result, TwitchError};
use crate::signal::{find_extrema, rebase_indices, time_window_indices};
use crate::trace::Trace;

/// Locate twitch peaks and valleys in a trace.
///
/// Restricts the trace to the configured time window, derives detection
/// thresholds from the sampling period and windowed amplitude range, runs
/// the constrained extrema search once for peaks and once on the inverted
/// signal for valleys, repairs duplicate valley detections, and returns
/// both index sequences in the trace's original coordinate space.
///
/// # Arguments
/// * `trace` - Time/amplitude trace (time in microseconds)
/// * `config` - Detection configuration
///
/// # Example
/// ```no_run
/// use myotwitch::{Trace, config::TwitchConfig, detect_twitches};
///
/// # fn trace() -> Trace { unimplemented!() }
/// let trace = trace();
/// let (peaks, valleys) = detect_twitches(&trace, &TwitchConfig::default()).unwrap();
/// ```
pub fn detect_twitches(trace: &Trace, config: &TwitchConfig) -> Result<(Vec<usize>, Vec<usize>)> {
    let detection = &config.detection;

    let window = time_window_indices(trace.time(), detection.start_time, detection.end_time);
    if window.is_empty() {
        return Err(TwitchError::Config(format!(
            "analysis window [{}, {}] contains no samples",
            detection.start_time, detection.end_time
        )));
    }

    let sign = if detection.twitches_point_up { 1.0 } else { -1.0 };
    let oriented: Vec<f64> = trace.amplitude()[window.clone()]
        .iter()
        .map(|&a| sign * a)
        .collect();

    let range = amplitude_range(&oriented);
    let thresholds = DetectionThresholds::derive(
        trace.sampling_period(),
        MAX_TWITCH_FREQUENCY,
        range,
        detection.prominence_factors,
        detection.width_factors,
    )?;

    let peaks = find_extrema(&oriented, &thresholds.peak);

    let inverted: Vec<f64> = oriented.iter().map(|&a| -a).collect();
    let valleys = find_extrema(&inverted, &thresholds.valley);
    let valleys = dedup_valleys(&valleys, &oriented);

    log::debug!(
        "detected {} peaks and {} valleys in window {:?} (min distance {} samples)",
        peaks.len(),
        valleys.len(),
        window,
        thresholds.min_distance
    );

    let shift = |indices: &[usize]| indices.iter().map(|&i| i + window.start).collect();
    Ok((shift(&peaks.indices), shift(&valleys.indices)))
}

/// Translate previously computed peak/valley indices into a sub-window's
/// coordinate space, discarding indices outside the window.
///
/// Used when the caller supplies its own peak/valley sets instead of
/// running detection.
pub fn windowed_peaks_valleys(
    window: &Range<usize>,
    peak_indices: &[usize],
    valley_indices: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    (
        rebase_indices(peak_indices, window),
        rebase_indices(valley_indices, window),
    )
}

fn amplitude_range(signal: &[f64]) -> f64 {
    let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}
