//! Tabular snapshot of records used by the filter engine.

use serde::{Deserialize, Serialize};

use crate::record::{Field, Record};

use super::predicate::parse_number;

/// Inferred kind of a column's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-empty cell parses as a number, and at least one exists.
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// A record together with its index in the snapshot it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub position: usize,
    pub record: Record,
}

/// Ordered, fixed-shape rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<TableRow>,
}

impl Table {
    /// Snapshot records, numbering rows from zero.
    pub fn from_records(records: &[Record]) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .map(|(position, record)| TableRow {
                position,
                record: record.clone(),
            })
            .collect();
        Self { rows }
    }

    pub(crate) fn from_rows(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Iterate over the records in row order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|row| &row.record)
    }

    /// Snapshot positions of the rows, in row order.
    pub fn positions(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.position).collect()
    }

    /// All values of a column, in row order.
    pub fn column_values(&self, field: Field) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row.record.get(field))
    }

    /// Infer whether a column holds numbers or text.
    pub fn column_kind(&self, field: Field) -> ColumnKind {
        let mut seen = false;
        for value in self.column_values(field).filter(|v| !v.trim().is_empty()) {
            if parse_number(value).is_none() {
                return ColumnKind::Text;
            }
            seen = true;
        }
        if seen {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}
