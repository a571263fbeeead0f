//! Example: summarise a farm statistics CSV file.
//!
//! Usage:
//!   cargo run --example summarize -- <file_path> [max_records]
//!
//! Example:
//!   cargo run --example summarize -- data/potatoes.csv 500

use std::env;
use std::path::Path;

use farmstat::{BooleanOp, Condition, FilterEngine, Operator, Repository};

fn main() -> farmstat::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example summarize -- <file_path> [max_records]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let max_records = args.get(2).and_then(|n| n.parse().ok());

    let (records, info) = Repository::new().load_with_info(path, max_records)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Dataset: {}", info.file);
    println!("{}", separator);
    println!("  Records: {}", info.record_count);
    println!("  Size: {} bytes", info.size_bytes);
    println!("  Hash: {}", info.hash);
    println!();

    let mut engine = FilterEngine::from_records(&records);
    let stats = engine.summary_statistics(None);

    println!("## Numeric Columns");
    for (column, s) in &stats.numeric {
        println!(
            "  {:<16} n={:<5} mean={:<12.2} min={:<10} max={}",
            column, s.count, s.mean, s.min, s.max
        );
    }
    println!();

    println!("## Text Columns");
    for (column, s) in &stats.text {
        println!(
            "  {:<16} unique={:<5} most common={}",
            column,
            s.unique_count,
            s.most_common.as_deref().unwrap_or("-")
        );
    }
    println!();

    let large = engine.search(
        &[Condition::new("VALUE", Operator::Gt, "1000")],
        BooleanOp::And,
        false,
    );
    println!("## Rows with VALUE > 1000: {}", large.len());
    for row in large.rows().iter().take(5) {
        println!(
            "  [{}] {} {} {}",
            row.position,
            row.record.ref_date(),
            row.record.geo(),
            row.record.value()
        );
    }

    Ok(())
}
