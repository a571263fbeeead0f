//! Filter command - one-shot condition search over a dataset.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use farmstat::{BooleanOp, Condition, FarmError, Field};

use crate::display;

#[allow(clippy::too_many_arguments)]
pub fn run(
    data: PathBuf,
    max_records: usize,
    conditions: Vec<String>,
    or: bool,
    case_sensitive: bool,
    export: Option<PathBuf>,
    stats: bool,
    unique: Option<String>,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let conditions = parse_conditions(&conditions, case_sensitive)?;
    if let Some(column) = &unique
        && Field::parse(column).is_none()
    {
        return Err(FarmError::InvalidField(column.clone()).into());
    }

    let service = super::load_service(&data, max_records)?;
    let boolean_op = if or { BooleanOp::Or } else { BooleanOp::And };

    let mut engine = service.filter_engine();
    let results = engine.search(&conditions, boolean_op, false);

    if let Some(path) = &export
        && !engine.export_csv(path, None)
    {
        let message = format!("Failed to export results to {}", path.display());
        return Err(message.into());
    }

    let summary = stats.then(|| engine.summary_statistics(None));
    let unique_values = unique
        .as_deref()
        .map(|column| engine.unique_values(column, None));

    if json_output {
        let output = serde_json::json!({
            "file": service.source().map(|s| s.file.clone()),
            "conditions": conditions,
            "boolean_op": boolean_op,
            "total_records": service.record_count(),
            "matched": results.len(),
            "results": results,
            "statistics": summary,
            "unique_values": unique_values,
            "exported_to": export.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", "Conditions:".yellow().bold())?;
    for (i, condition) in conditions.iter().enumerate() {
        let joiner = if i == 0 { String::new() } else { boolean_op.to_string() };
        writeln!(out, "  {:<3} {}", joiner.dimmed(), condition.description())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{} {} of {} records",
        "Matched".cyan().bold(),
        results.len().to_string().white().bold(),
        service.record_count()
    )?;
    writeln!(out)?;
    display::write_table(&mut out, &results, display::TABLE_LIMIT)?;

    if let Some(summary) = &summary {
        display::write_statistics(&mut out, summary)?;
    }
    if let (Some(column), Some(values)) = (&unique, &unique_values) {
        display::write_unique_values(&mut out, column, values)?;
    }
    if let Some(path) = &export {
        writeln!(
            out,
            "\n{} {}",
            "Results exported to".green(),
            path.display()
        )?;
    }

    Ok(())
}

/// Parse condition strings, rejecting unknown columns up front.
fn parse_conditions(inputs: &[String], case_sensitive: bool) -> Result<Vec<Condition>, FarmError> {
    inputs
        .iter()
        .map(|input| {
            let condition: Condition = input.parse()?;
            if Field::parse(&condition.column).is_none() {
                return Err(FarmError::InvalidField(condition.column));
            }
            Ok(condition.case_sensitive(case_sensitive))
        })
        .collect()
}
