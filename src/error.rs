use thiserror::Error;

use crate::metrics::MetricId;

#[derive(Error, Debug)]
pub enum TwitchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Too few peaks detected: need at least {required}, found {actual}")]
    TooFewPeaks { required: usize, actual: usize },

    #[error("Too few valleys detected: need at least {required}, found {actual}")]
    TooFewValleys { required: usize, actual: usize },

    #[error("Two contractions in a row at sample indices {first} and {second}")]
    TwoPeaksInARow { first: usize, second: usize },

    #[error("Two relaxations in a row at sample indices {first} and {second}")]
    TwoValleysInARow { first: usize, second: usize },

    #[error("Metric {metric} unavailable: {reason}")]
    MetricUnavailable { metric: MetricId, reason: String },
}

pub type Result<T> = std::result::Result<T, TwitchError>;
