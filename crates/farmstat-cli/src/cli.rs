//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Farmstat: record manager for farm statistics CSV datasets
#[derive(Parser)]
#[command(name = "farmstat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dataset to load at start-up
    #[arg(short, long, global = true, default_value = "data/potatoes.csv")]
    pub data: PathBuf,

    /// Maximum number of rows to read from a dataset
    #[arg(short, long, global = true, default_value_t = farmstat::DEFAULT_MAX_RECORDS)]
    pub max_records: usize,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive record manager (the default)
    Menu,

    /// Filter the dataset with one or more conditions
    Filter {
        /// Condition such as "VALUE > 1200" or "GEO contains ont" (repeatable)
        #[arg(short = 'w', long = "where", value_name = "CONDITION", required = true)]
        conditions: Vec<String>,

        /// Combine conditions with OR instead of AND
        #[arg(long)]
        or: bool,

        /// Treat text conditions as case-sensitive
        #[arg(long)]
        case_sensitive: bool,

        /// Write matching rows to a CSV file
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Print summary statistics of the matches
        #[arg(long)]
        stats: bool,

        /// Print distinct values of a column among the matches
        #[arg(short, long, value_name = "COLUMN")]
        unique: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the top N records by a field without reordering the dataset
    Top {
        /// Number of records to show
        #[arg(value_name = "N")]
        n: usize,

        /// Field to rank by
        #[arg(short, long, default_value = "value")]
        by: TopField,

        /// Rank in ascending order
        #[arg(long)]
        asc: bool,
    },
}

/// Fields offered for top-N ranking.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TopField {
    Value,
    RefDate,
    Geo,
}

impl TopField {
    pub fn field(self) -> farmstat::Field {
        match self {
            TopField::Value => farmstat::Field::Value,
            TopField::RefDate => farmstat::Field::RefDate,
            TopField::Geo => farmstat::Field::Geo,
        }
    }
}
