//! Repair of duplicate valley detections.
//!
//! The constrained search occasionally reports two valleys for a single
//! true baseline dip; such pairs share numerically identical left and
//! right half-height intersection positions. The repair keeps the deeper
//! of the two and is a bounded heuristic, not a generic retry.

use crate::signal::ExtremumSet;

/// Merge valley detections that share both half-height intersection
/// positions, keeping the deeper detection of each duplicate pair.
///
/// `oriented` is the orientation-adjusted signal the valleys were detected
/// in (valleys are its local minima). Comparison does not advance past an
/// unresolved pair, so clusters of more than two duplicates collapse to
/// the single deepest detection. Builds fresh vectors rather than removing
/// from the input in place.
pub fn dedup_valleys(valleys: &ExtremumSet, oriented: &[f64]) -> ExtremumSet {
    // positions into the valley arrays, not sample indices
    let mut kept: Vec<usize> = Vec::with_capacity(valleys.len());

    for pos in 0..valleys.len() {
        if let Some(&prev) = kept.last() {
            let duplicate = valleys.left_ips[prev] == valleys.left_ips[pos]
                && valleys.right_ips[prev] == valleys.right_ips[pos];
            if duplicate {
                if oriented[valleys.indices[pos]] < oriented[valleys.indices[prev]] {
                    kept.pop();
                    kept.push(pos);
                }
                continue;
            }
        }
        kept.push(pos);
    }

    ExtremumSet {
        indices: kept.iter().map(|&p| valleys.indices[p]).collect(),
        left_ips: kept.iter().map(|&p| valleys.left_ips[p]).collect(),
        right_ips: kept.iter().map(|&p| valleys.right_ips[p]).collect(),
    }
}
