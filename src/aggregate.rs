//! Grouping of loaded records into per-experiment metric maps.
//!
//! One pass over the record list builds everything the renderer needs: the
//! experiment → (metric → value) map, plus experiment and metric name lists
//! in first-seen order so output is deterministic run to run.

use crate::loader::MetricRecord;
use std::collections::HashMap;

/// Aggregated view of a record list.
///
/// Duplicate `(experiment, metric)` pairs keep the last value seen; that is
/// the expected way to override an earlier measurement, not an error.
#[derive(Debug, Default)]
pub struct MetricTable {
    experiments: Vec<String>,
    metrics: Vec<String>,
    values: HashMap<String, HashMap<String, f64>>,
    record_count: usize,
}

impl MetricTable {
    /// Build the table in a single pass over `records`.
    pub fn from_records(records: &[MetricRecord]) -> Self {
        let mut table = MetricTable::default();
        for record in records {
            if !table.values.contains_key(&record.experiment) {
                table.experiments.push(record.experiment.clone());
            }
            if !table.metrics.iter().any(|m| m == &record.metric) {
                table.metrics.push(record.metric.clone());
            }
            let prev = table
                .values
                .entry(record.experiment.clone())
                .or_default()
                .insert(record.metric.clone(), record.value);
            if prev.is_some() {
                tracing::debug!(
                    experiment = %record.experiment,
                    metric = %record.metric,
                    "duplicate record, keeping last value"
                );
            }
        }
        table.record_count = records.len();
        table
    }

    /// Distinct metric names in first-seen order.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Experiment names in first-seen order.
    pub fn experiments(&self) -> &[String] {
        &self.experiments
    }

    /// Number of records the table was built from, duplicates included.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Value recorded for one (experiment, metric) pair, if any.
    pub fn value(&self, experiment: &str, metric: &str) -> Option<f64> {
        self.values
            .get(experiment)
            .and_then(|metrics| metrics.get(metric))
            .copied()
    }

    /// Experiments that reported `metric`, with their values, in first-seen
    /// experiment order. Experiments lacking the metric are skipped.
    pub fn series_for(&self, metric: &str) -> Vec<(&str, f64)> {
        self.experiments
            .iter()
            .filter_map(|exp| self.value(exp, metric).map(|v| (exp.as_str(), v)))
            .collect()
    }
}
