//! Numeric constants for twitch detection and metric reporting.
//!
//! Trace time values are in microseconds; metrics that report durations
//! divide by `MICRO_TO_BASE_CONVERSION` to yield seconds.

/// Conversion between microseconds (trace time axis) and seconds.
pub const MICRO_TO_BASE_CONVERSION: f64 = 1_000_000.0;

/// Fastest twitch rate considered physiologically plausible, in events per
/// second. Sets the minimum sample distance between detected extrema.
pub const MAX_TWITCH_FREQUENCY: f64 = 7.0;

/// Minimum number of peaks required before twitch sequencing is attempted.
pub const MIN_NUMBER_PEAKS: usize = 1;

/// Minimum number of valleys required before twitch sequencing is attempted.
pub const MIN_NUMBER_VALLEYS: usize = 1;

/// Default divisors applied to the signal amplitude range to obtain the
/// (peak, valley) prominence thresholds.
pub const DEFAULT_PROMINENCE_FACTORS: (f64, f64) = (6.0, 6.0);

/// Default divisors applied to the minimum sample distance to obtain the
/// (peak, valley) width thresholds.
pub const DEFAULT_WIDTH_FACTORS: (f64, f64) = (7.0, 7.0);

/// Default twitch width percentages evaluated by width-family metrics.
pub const DEFAULT_TWITCH_WIDTH_PERCENTS: [u32; 17] = [
    10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90,
];

/// Default (contraction, relaxation) width percentages anchoring the
/// baseline used by amplitude, AUC, and velocity metrics.
pub const DEFAULT_BASELINE_WIDTHS: (u32, u32) = (10, 90);

/// Epsilon for preventing division by zero in interpolation calculations.
pub const INTERPOLATION_EPSILON: f64 = 1e-12;
