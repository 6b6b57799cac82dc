//! Output tables filled column-by-column by metric providers.

use serde::Serialize;

use crate::metrics::MetricId;
use crate::metrics::stats::SummaryStats;

/// Column address: a metric plus an optional width percentage for
/// width-family metrics (e.g. width at 50%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ColumnKey {
    pub metric: MetricId,
    pub width_percent: Option<u32>,
}

impl ColumnKey {
    pub fn scalar(metric: MetricId) -> Self {
        Self {
            metric,
            width_percent: None,
        }
    }

    pub fn with_width(metric: MetricId, width_percent: u32) -> Self {
        Self {
            metric,
            width_percent: Some(width_percent),
        }
    }
}

/// Per-twitch metric values: one row per twitch record (keyed by anchor
/// peak index), one column per (metric, width percentage). Cells are
/// absent where a metric is undefined for a twitch. Columns appear in
/// provider completion order; metrics that failed contribute none.
#[derive(Debug, Clone, Serialize)]
pub struct PerTwitchTable {
    peak_indices: Vec<usize>,
    columns: Vec<(ColumnKey, Vec<Option<f64>>)>,
}

impl PerTwitchTable {
    pub fn new(peak_indices: Vec<usize>) -> Self {
        Self {
            peak_indices,
            columns: Vec::new(),
        }
    }

    /// Anchor peak index of each row
    pub fn peak_indices(&self) -> &[usize] {
        &self.peak_indices
    }

    pub fn num_rows(&self) -> usize {
        self.peak_indices.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Insert a full column; replaces any column already at `key`.
    /// `values` must hold one entry per row.
    pub fn insert_column(&mut self, key: ColumnKey, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.peak_indices.len());
        if let Some(existing) = self.columns.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = values;
        } else {
            self.columns.push((key, values));
        }
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(key, _)| key)
    }

    /// Value for one twitch (by anchor peak index) in one column
    pub fn value(&self, peak_index: usize, key: &ColumnKey) -> Option<f64> {
        let row = self.peak_indices.iter().position(|&p| p == peak_index)?;
        self.column(key)?.get(row).copied().flatten()
    }
}

/// Aggregate statistics: a single row of summary statistics per
/// (metric, width percentage) column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateTable {
    columns: Vec<(ColumnKey, SummaryStats)>,
}

impl AggregateTable {
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Insert one column of statistics; replaces any column already at `key`.
    pub fn insert_column(&mut self, key: ColumnKey, stats: SummaryStats) {
        if let Some(existing) = self.columns.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = stats;
        } else {
            self.columns.push((key, stats));
        }
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&SummaryStats> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, stats)| stats)
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_twitch_table_columns() {
        let mut table = PerTwitchTable::new(vec![20, 40]);
        let key = ColumnKey::scalar(MetricId::Amplitude);
        table.insert_column(key, vec![Some(1.5), None]);

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.value(20, &key), Some(1.5));
        assert_eq!(table.value(40, &key), None);
        assert_eq!(table.value(99, &key), None);
    }

    #[test]
    fn test_insert_column_replaces_existing() {
        let mut table = PerTwitchTable::new(vec![20]);
        let key = ColumnKey::with_width(MetricId::Width, 50);
        table.insert_column(key, vec![Some(1.0)]);
        table.insert_column(key, vec![Some(2.0)]);
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.value(20, &key), Some(2.0));
    }

    #[test]
    fn test_aggregate_table_lookup() {
        let mut table = AggregateTable::default();
        let key = ColumnKey::scalar(MetricId::Period);
        table.insert_column(key, SummaryStats::from_values(&[Some(2.0), Some(4.0)], false));

        let stats = table.column(&key).unwrap();
        assert_eq!(stats.n, 2);
        assert_eq!(stats.mean, Some(3.0));
        assert!(table.column(&ColumnKey::scalar(MetricId::Frequency)).is_none());
    }
}
