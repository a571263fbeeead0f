//! Summary statistics over a filtered table.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Field;

use super::predicate::parse_number;
use super::table::Table;

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    /// Number of non-empty values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (zero for fewer than two values).
    pub std: f64,
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    pub max: f64,
}

impl NumericStatistics {
    /// Compute statistics, or `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q3: percentile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }

    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Statistics for a text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Number of distinct values; the empty string counts as one.
    pub unique_count: usize,
    /// Most frequent value; ties go to the smallest value.
    pub most_common: Option<String>,
}

impl TextStatistics {
    fn from_values<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }

        let most_common = counts
            .iter()
            .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
            .map(|(v, _)| v.to_string());

        Self {
            unique_count: counts.len(),
            most_common,
        }
    }
}

/// Row count plus per-column statistics, keyed by column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_records: usize,
    pub numeric: IndexMap<String, NumericStatistics>,
    pub text: IndexMap<String, TextStatistics>,
}

impl SummaryStatistics {
    /// Summarise every column of `table`, in CSV column order.
    pub fn compute(table: &Table) -> Self {
        let mut numeric = IndexMap::new();
        let mut text = IndexMap::new();

        for field in Field::ALL {
            if table.column_kind(field).is_numeric() {
                let values: Vec<f64> = table
                    .column_values(field)
                    .filter_map(parse_number)
                    .collect();
                if let Some(stats) = NumericStatistics::from_values(&values) {
                    numeric.insert(field.header().to_string(), stats);
                }
            } else {
                text.insert(
                    field.header().to_string(),
                    TextStatistics::from_values(table.column_values(field)),
                );
            }
        }

        Self {
            total_records: table.len(),
            numeric,
            text,
        }
    }
}
