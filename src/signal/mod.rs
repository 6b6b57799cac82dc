pub mod extrema;
pub mod interpolate;
pub mod window;

pub use extrema::{ExtremaConstraints, ExtremumSet, find_extrema};
pub use window::{rebase_indices, time_window_indices};
