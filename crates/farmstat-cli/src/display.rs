//! Formatting of records, result tables and statistics for the console.

use std::io::{self, Write};

use colored::Colorize;
use farmstat::{Record, SummaryStatistics, Table};

/// Most rows printed for a result table.
pub const TABLE_LIMIT: usize = 20;

/// Most values printed for a unique-value listing.
pub const UNIQUE_LIMIT: usize = 50;

pub fn write_record<W: Write>(out: &mut W, index: usize, record: &Record) -> io::Result<()> {
    writeln!(out, "\n{}", format!("Record #{}:", index).bold())?;
    writeln!(out, "{}", record)
}

pub fn write_records<W: Write>(out: &mut W, records: &[(usize, Record)]) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(60))?;
    for (index, record) in records {
        write_record(out, *index, record)?;
    }
    Ok(())
}

/// Compact one-line-per-row view of a result table.
pub fn write_table<W: Write>(out: &mut W, table: &Table, limit: usize) -> io::Result<()> {
    if table.is_empty() {
        return writeln!(out, "{}", "No results found.".yellow());
    }

    writeln!(
        out,
        "{}",
        format!(
            "{:>6}  {:<10} {:<24} {:<36} {:>14}  {}",
            "#", "REF_DATE", "GEO", "DESCRIPTION", "VALUE", "UOM"
        )
        .bold()
    )?;
    for row in table.rows().iter().take(limit) {
        let r = &row.record;
        writeln!(
            out,
            "{:>6}  {:<10} {:<24} {:<36} {:>14}  {}",
            row.position,
            truncate(r.ref_date(), 10),
            truncate(r.geo(), 24),
            truncate(r.area_production_farm_value(), 36),
            truncate(r.value(), 14),
            r.uom()
        )?;
    }
    if table.len() > limit {
        writeln!(out, "... and {} more rows", table.len() - limit)?;
    }
    Ok(())
}

pub fn write_statistics<W: Write>(out: &mut W, stats: &SummaryStatistics) -> io::Result<()> {
    writeln!(out, "\n{}", "Summary Statistics".cyan().bold())?;
    writeln!(
        out,
        "Total records: {}",
        stats.total_records.to_string().white().bold()
    )?;

    if !stats.numeric.is_empty() {
        writeln!(out, "\n{}", "Numeric columns:".yellow().bold())?;
        for (column, s) in &stats.numeric {
            writeln!(
                out,
                "  {:<28} count={} mean={:.2} std={:.2} min={} q1={:.2} median={:.2} q3={:.2} max={}",
                column,
                s.count,
                s.mean,
                s.std,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max
            )?;
        }
    }

    if !stats.text.is_empty() {
        writeln!(out, "\n{}", "Text columns:".yellow().bold())?;
        for (column, s) in &stats.text {
            writeln!(
                out,
                "  {:<28} unique={} most common={}",
                column,
                s.unique_count,
                s.most_common.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

pub fn write_unique_values<W: Write>(
    out: &mut W,
    column: &str,
    values: &[String],
) -> io::Result<()> {
    if values.is_empty() {
        return writeln!(
            out,
            "{}",
            format!("No unique values found for {}", column).yellow()
        );
    }

    writeln!(out, "\n{}", format!("Unique values in {}:", column).bold())?;
    writeln!(out, "Count: {}\n", values.len().to_string().green())?;
    for (i, value) in values.iter().take(UNIQUE_LIMIT).enumerate() {
        writeln!(out, "  {}. {}", i + 1, value)?;
    }
    if values.len() > UNIQUE_LIMIT {
        writeln!(out, "\n... and {} more values", values.len() - UNIQUE_LIMIT)?;
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstat::Field;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Ontario", 10), "Ontario");
        assert_eq!(truncate("Prince Edward Island", 6), "Princ…");
    }

    #[test]
    fn test_write_table_limits_rows() {
        colored::control::set_override(false);
        let records: Vec<Record> = (0..5)
            .map(|i| Record::new().with(Field::Geo, format!("P{}", i)))
            .collect();
        let table = Table::from_records(&records);

        let mut out = Vec::new();
        write_table(&mut out, &table, 3).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("P2"));
        assert!(!text.contains("P3"));
        assert!(text.contains("... and 2 more rows"));
    }

    #[test]
    fn test_write_unique_values_empty() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_unique_values(&mut out, "GEO", &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No unique values found for GEO\n"
        );
    }
}
