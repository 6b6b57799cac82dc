//! Time/amplitude trace consumed by one detection run.

use serde::Serialize;

use crate::error::{Result, TwitchError};

/// An immutable two-row trace: time values in microseconds (strictly
/// increasing, uniform step after interpolation) and the matching
/// amplitude values.
///
/// # Example
/// ```
/// use myotwitch::Trace;
///
/// let trace = Trace::new(vec![0.0, 10_000.0, 20_000.0], vec![0.0, 1.0, 0.0]).unwrap();
/// assert_eq!(trace.sampling_period(), 10_000.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    time: Vec<f64>,
    amplitude: Vec<f64>,
}

impl Trace {
    /// Create a trace from parallel time and amplitude rows.
    ///
    /// # Arguments
    /// * `time` - Sample times in microseconds, strictly increasing
    /// * `amplitude` - Sample amplitudes, same length as `time`
    pub fn new(time: Vec<f64>, amplitude: Vec<f64>) -> Result<Self> {
        if time.len() != amplitude.len() {
            return Err(TwitchError::Config(format!(
                "time and amplitude rows differ in length: {} vs {}",
                time.len(),
                amplitude.len()
            )));
        }
        if time.len() < 2 {
            return Err(TwitchError::Config(
                "trace must contain at least two samples".to_string(),
            ));
        }
        if time.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TwitchError::Config(
                "trace time values must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { time, amplitude })
    }

    /// Number of samples in the trace
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times in microseconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Sample amplitudes
    pub fn amplitude(&self) -> &[f64] {
        &self.amplitude
    }

    /// Time between consecutive samples in microseconds, taken from the
    /// first pair (the trace is uniform after interpolation).
    pub fn sampling_period(&self) -> f64 {
        self.time[1] - self.time[0]
    }

    /// Copy of this trace with the amplitude row negated. Used to analyze
    /// waveforms whose twitch events point downward.
    pub(crate) fn inverted(&self) -> Trace {
        Trace {
            time: self.time.clone(),
            amplitude: self.amplitude.iter().map(|&a| -a).collect(),
        }
    }
}
