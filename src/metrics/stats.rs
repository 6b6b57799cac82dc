//! Summary statistics over per-twitch metric values.

use serde::Serialize;

/// Summary statistics for one metric column.
///
/// `n` counts every twitch the metric was estimated over, including
/// twitches where the value is absent; the remaining statistics are
/// computed over the present values only and are `None` when there are
/// none. The standard deviation is the population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    /// Coefficient of variation (std_dev / mean)
    pub cov: Option<f64>,
    /// Standard error of the mean (std_dev / sqrt(n))
    pub sem: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStats {
    /// Compute statistics over a column of per-twitch values.
    ///
    /// # Arguments
    /// * `values` - One entry per twitch, absent entries skipped
    /// * `rounded` - Round every statistic to a whole number
    pub fn from_values(values: &[Option<f64>], rounded: bool) -> Self {
        let n = values.len();
        let present: Vec<f64> = values
            .iter()
            .filter_map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        if present.is_empty() {
            return Self {
                n,
                mean: None,
                std_dev: None,
                cov: None,
                sem: None,
                min: None,
                max: None,
            };
        }

        let count = present.len() as f64;
        let mean = present.iter().sum::<f64>() / count;
        let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let std_dev = variance.sqrt();
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let finish = |v: f64| if rounded { Some(v.round()) } else { Some(v) };

        Self {
            n,
            mean: finish(mean),
            std_dev: finish(std_dev),
            cov: finish(std_dev / mean),
            sem: finish(std_dev / (n as f64).sqrt()),
            min: finish(min),
            max: finish(max),
        }
    }
}
