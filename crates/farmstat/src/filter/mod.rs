//! Multi-condition filtering over a snapshot of the record collection.

mod condition;
mod engine;
mod predicate;
mod stats;
mod table;

pub use condition::{BooleanOp, Condition, Operator};
pub use engine::{FilterEngine, SearchStep, SessionState};
pub use stats::{NumericStatistics, SummaryStatistics, TextStatistics};
pub use table::{ColumnKind, Table, TableRow};
