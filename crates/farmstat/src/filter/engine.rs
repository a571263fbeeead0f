//! Filter engine: condition evaluation, refinement and result utilities.

use std::cmp::Ordering;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::record::{Field, Record};
use crate::repository::Repository;

use super::condition::{BooleanOp, Condition};
use super::predicate::{Predicate, parse_number};
use super::stats::SummaryStatistics;
use super::table::{ColumnKind, Table, TableRow};

/// One executed search, as recorded in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    pub conditions: Vec<Condition>,
    pub boolean_op: BooleanOp,
    /// Whether the search ran against the previous results.
    pub refined: bool,
    pub result_count: usize,
}

/// Whether a search session has produced results yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    HasResults,
}

/// Filters a snapshot of the record collection.
///
/// The snapshot is taken once at construction and never follows later
/// changes to the collection it came from.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    snapshot: Table,
    last_results: Option<Table>,
    history: Vec<SearchStep>,
    repository: Repository,
}

impl FilterEngine {
    /// Create an engine over a copy of `records`.
    pub fn from_records(records: &[Record]) -> Self {
        Self::with_repository(records, Repository::new())
    }

    /// Create an engine that exports through `repository`.
    pub fn with_repository(records: &[Record], repository: Repository) -> Self {
        Self {
            snapshot: Table::from_records(records),
            last_results: None,
            history: Vec::new(),
            repository,
        }
    }

    /// The full snapshot.
    pub fn snapshot(&self) -> &Table {
        &self.snapshot
    }

    /// Column headers in CSV order.
    pub fn available_columns(&self) -> Vec<&'static str> {
        Field::ALL.iter().map(|f| f.header()).collect()
    }

    /// Inferred kind of a column in the snapshot, `None` for unknown columns.
    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        Field::parse(column).map(|f| self.snapshot.column_kind(f))
    }

    /// Run a search.
    ///
    /// Conditions are combined left to right with the single `boolean_op`.
    /// With `refine_previous` set and previous results available, only those
    /// rows are searched. An empty condition list returns the base table
    /// unchanged.
    pub fn search(
        &mut self,
        conditions: &[Condition],
        boolean_op: BooleanOp,
        refine_previous: bool,
    ) -> Table {
        let refined = refine_previous && self.last_results.is_some();
        let base = match (&self.last_results, refined) {
            (Some(previous), true) => previous,
            _ => &self.snapshot,
        };

        if conditions.is_empty() {
            let base = base.clone();
            self.last_results = Some(base.clone());
            return base;
        }

        let predicates: Vec<Option<Predicate>> =
            conditions.iter().map(Predicate::compile).collect();

        let rows: Vec<TableRow> = base
            .rows()
            .iter()
            .filter(|row| combine(&predicates, &row.record, boolean_op))
            .cloned()
            .collect();
        let results = Table::from_rows(rows);

        log::debug!(
            "search with {} condition(s) ({}) matched {} of {} rows",
            conditions.len(),
            boolean_op,
            results.len(),
            base.len()
        );

        self.history.push(SearchStep {
            conditions: conditions.to_vec(),
            boolean_op,
            refined,
            result_count: results.len(),
        });
        self.last_results = Some(results.clone());

        results
    }

    /// Results of the last search, if any.
    pub fn last_results(&self) -> Option<&Table> {
        self.last_results.as_ref()
    }

    /// Searches run since the last [`clear`](Self::clear).
    pub fn history(&self) -> &[SearchStep] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        if self.last_results.is_some() {
            SessionState::HasResults
        } else {
            SessionState::Empty
        }
    }

    /// Forget the last results and the search history.
    pub fn clear(&mut self) {
        self.last_results = None;
        self.history.clear();
    }

    /// Summarise `table`, defaulting to the last results or the snapshot.
    pub fn summary_statistics(&self, table: Option<&Table>) -> SummaryStatistics {
        SummaryStatistics::compute(self.target(table))
    }

    /// Sorted distinct values of a column, the empty string included.
    ///
    /// Numeric columns sort by value with the empty value first, text
    /// columns lexicographically. Unknown columns yield nothing.
    pub fn unique_values(&self, column: &str, table: Option<&Table>) -> Vec<String> {
        let Some(field) = Field::parse(column) else {
            return Vec::new();
        };
        let table = self.target(table);

        let distinct: IndexSet<&str> = table.column_values(field).collect();
        let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        if table.column_kind(field).is_numeric() {
            values.sort_by(|a, b| match (parse_number(a), parse_number(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (x, y) => x.is_some().cmp(&y.is_some()),
            });
        } else {
            values.sort();
        }
        values
    }

    /// Write `table` (default: last results, else snapshot) to a CSV file.
    pub fn export_csv(&self, path: impl AsRef<Path>, table: Option<&Table>) -> bool {
        let path = path.as_ref();
        let table = self.target(table);
        match self.repository.export(table.records(), path) {
            Ok(()) => {
                log::info!("exported {} rows to '{}'", table.len(), path.display());
                true
            }
            Err(e) => {
                log::error!("error exporting to CSV: {e}");
                false
            }
        }
    }

    fn target<'a>(&'a self, table: Option<&'a Table>) -> &'a Table {
        table
            .or(self.last_results.as_ref())
            .unwrap_or(&self.snapshot)
    }
}

/// Fold per-condition results left to right. A predicate that failed to
/// compile never matches.
fn combine(predicates: &[Option<Predicate>], record: &Record, boolean_op: BooleanOp) -> bool {
    let mut results = predicates
        .iter()
        .map(|p| p.as_ref().is_some_and(|p| p.matches(record)));

    let Some(first) = results.next() else {
        return true;
    };
    results.fold(first, |acc, matched| match boolean_op {
        BooleanOp::And => acc && matched,
        BooleanOp::Or => acc || matched,
    })
}
