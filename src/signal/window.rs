//! Restriction of a trace and its index arrays to a closed time interval.

use std::ops::Range;

/// Find the contiguous range of sample indices whose time values fall in
/// the closed interval `[start_time, end_time]`.
///
/// Time values must be sorted ascending (guaranteed by `Trace`). An
/// unbounded `end_time` (infinity) covers the rest of the trace. The range
/// is empty when no samples fall inside the interval.
///
/// # Arguments
/// * `time` - Sample times, sorted ascending
/// * `start_time` - Inclusive window start
/// * `end_time` - Inclusive window end
pub fn time_window_indices(time: &[f64], start_time: f64, end_time: f64) -> Range<usize> {
    let start = time.partition_point(|&t| t < start_time);
    let end = time.partition_point(|&t| t <= end_time);
    start..end.max(start)
}

/// Re-base an index array into a window's coordinate space.
///
/// Subtracts the window's starting offset from each index and discards
/// indices that fall outside `[0, window_length)`. Used to translate
/// previously computed peak/valley indices into a sub-window.
pub fn rebase_indices(indices: &[usize], window: &Range<usize>) -> Vec<usize> {
    let len = window.len();
    indices
        .iter()
        .filter_map(|&idx| idx.checked_sub(window.start).filter(|&rebased| rebased < len))
        .collect()
}
