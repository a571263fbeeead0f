//! Top command - rank records by a field without reordering the dataset.

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::TopField;

pub fn run(
    data: PathBuf,
    max_records: usize,
    n: usize,
    by: TopField,
    ascending: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if n == 0 {
        return Err("N must be greater than 0".into());
    }

    let service = super::load_service(&data, max_records)?;
    let field = by.field();
    let top = service.top_n(n, field.name(), ascending);

    let order = if ascending { "ascending" } else { "descending" };
    println!(
        "{} {} records by {} ({})",
        "Top".cyan().bold(),
        top.len().to_string().white().bold(),
        field.name(),
        order
    );
    println!("{}", "=".repeat(60));

    for (rank, record) in top.iter().enumerate() {
        println!(
            "{:>4}. {:<10} {:<28} {:>14} {}",
            (rank + 1).to_string().bold(),
            record.ref_date(),
            record.geo(),
            record.value(),
            record.uom().dimmed()
        );
    }

    Ok(())
}
