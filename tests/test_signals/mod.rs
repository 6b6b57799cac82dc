//! Deterministic synthetic twitch waveforms for integration tests.

use myotwitch::Trace;

/// Sampling period of the generated traces in microseconds (100 Hz).
pub const SAMPLING_PERIOD_US: f64 = 10_000.0;

/// Samples per twitch cycle at the default generator settings.
pub const SAMPLES_PER_CYCLE: usize = 50;

/// Generate a raised-cosine twitch train.
///
/// Each cycle spans `SAMPLES_PER_CYCLE` samples; valleys sit on the
/// baseline at cycle boundaries and peaks of height `amplitude` at cycle
/// midpoints, so the expected extrema land on exact sample indices:
/// peaks at `25 + 50k`, interior valleys at `50k`.
pub fn generate_twitch_trace(num_cycles: usize, amplitude: f64, baseline: f64) -> Trace {
    let n = num_cycles * SAMPLES_PER_CYCLE + 1;
    let time: Vec<f64> = (0..n).map(|i| i as f64 * SAMPLING_PERIOD_US).collect();
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / SAMPLES_PER_CYCLE as f64;
            baseline + amplitude * 0.5 * (1.0 - phase.cos())
        })
        .collect();
    Trace::new(time, values).unwrap()
}

/// Expected peak sample indices for `generate_twitch_trace(num_cycles, ..)`.
pub fn expected_peaks(num_cycles: usize) -> Vec<usize> {
    (0..num_cycles)
        .map(|k| SAMPLES_PER_CYCLE / 2 + k * SAMPLES_PER_CYCLE)
        .collect()
}

/// Expected interior valley sample indices (the boundary valleys at the
/// trace edges are not detectable).
pub fn expected_valleys(num_cycles: usize) -> Vec<usize> {
    (1..num_cycles).map(|k| k * SAMPLES_PER_CYCLE).collect()
}
