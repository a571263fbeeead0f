//! Farmstat: record manager and filter engine for farm statistics datasets.
//!
//! A dataset is a CSV file with a fixed fifteen-column layout (reference
//! date, location, measurement description, value and so on). Farmstat loads
//! a bounded number of rows into memory, edits them by position, sorts and
//! ranks them, and filters them with typed multi-condition queries.
//!
//! # Example
//!
//! ```no_run
//! use farmstat::{BooleanOp, Condition, Operator, RecordService};
//!
//! let mut service = RecordService::new();
//! service.load_from_file("potatoes.csv", Some(100));
//!
//! let mut engine = service.filter_engine();
//! let results = engine.search(
//!     &[Condition::new("VALUE", Operator::Gt, "1200")],
//!     BooleanOp::And,
//!     false,
//! );
//! println!("Matches: {}", results.len());
//! ```

pub mod error;
pub mod filter;
pub mod record;
pub mod repository;
pub mod service;

pub use error::{FarmError, Result};
pub use filter::{
    BooleanOp, ColumnKind, Condition, FilterEngine, NumericStatistics, Operator, SearchStep,
    SessionState, SummaryStatistics, Table, TableRow, TextStatistics,
};
pub use record::{Field, Record};
pub use repository::{DEFAULT_MAX_RECORDS, DatasetInfo, Repository, RepositoryConfig};
pub use service::RecordService;
