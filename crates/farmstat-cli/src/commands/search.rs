//! Interactive multi-condition filter session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use farmstat::{BooleanOp, Condition, Field, FilterEngine, Operator};

use super::Flow;
use crate::console::Console;
use crate::display;

const DEFAULT_EXPORT_FILE: &str = "search_results.csv";

/// Outcome of one interactive question.
enum Answer<T> {
    Given(T),
    Invalid,
    Eof,
}

/// What the user picked after a search.
enum Next {
    NewSearch,
    Refine,
    Leave(Flow),
}

/// Run a filter session against `engine` until the user returns to the menu.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &mut FilterEngine,
) -> io::Result<Flow> {
    console.heading("Interactive Search")?;
    writeln!(
        console.out(),
        "Filter records using multiple conditions with AND/OR logic"
    )?;

    match console.confirm("Show operator help?", false)? {
        None => return Ok(Flow::Exit),
        Some(true) => write_operator_help(console)?,
        Some(false) => {}
    }

    let mut refine = false;
    loop {
        let (conditions, boolean_op) = match read_conditions(console, engine)? {
            Answer::Given(query) => query,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };

        writeln!(console.out(), "\n{}", "Executing search...".yellow())?;
        let results = engine.search(&conditions, boolean_op, refine);
        if results.is_empty() {
            console.warning("No results found.")?;
            return Ok(Flow::Continue);
        }
        console.success(&format!("\nFound {} matching records", results.len()))?;
        display::write_table(console.out(), &results, display::TABLE_LIMIT)?;

        match post_search(console, engine)? {
            Next::NewSearch => refine = false,
            Next::Refine => refine = true,
            Next::Leave(flow) => return Ok(flow),
        }
    }
}

fn write_operator_help<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<()> {
    writeln!(console.out(), "\n{}", "Operators:".bold())?;
    for op in Operator::ALL {
        writeln!(console.out(), "  {:<12} {}", op.symbol(), op.description())?;
    }
    Ok(())
}

fn write_columns<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &FilterEngine,
) -> io::Result<()> {
    writeln!(console.out(), "\nAvailable columns:")?;
    for (i, column) in engine.available_columns().into_iter().enumerate() {
        let kind = match engine.column_kind(column) {
            Some(kind) if kind.is_numeric() => "numeric",
            _ => "text",
        };
        writeln!(console.out(), "  {:>2}. {} ({})", i + 1, column, kind)?;
    }
    Ok(())
}

/// Accept a column by position in the listing or by name.
fn read_column<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &FilterEngine,
) -> io::Result<Answer<Field>> {
    write_columns(console, engine)?;
    let Some(input) = console.prompt("Enter column name or number: ")? else {
        return Ok(Answer::Eof);
    };

    let field = match input.parse::<usize>() {
        Ok(n) if (1..=Field::ALL.len()).contains(&n) => Some(Field::ALL[n - 1]),
        _ => Field::parse(&input),
    };
    match field {
        Some(field) => Ok(Answer::Given(field)),
        None => {
            console.error(&format!("Invalid column: {}", input))?;
            Ok(Answer::Invalid)
        }
    }
}

fn read_condition<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &FilterEngine,
) -> io::Result<Answer<Condition>> {
    let field = match read_column(console, engine)? {
        Answer::Given(field) => field,
        Answer::Invalid => return Ok(Answer::Invalid),
        Answer::Eof => return Ok(Answer::Eof),
    };

    writeln!(console.out(), "Comparison: ==, !=, >, <, >=, <=")?;
    writeln!(console.out(), "Text: contains, startswith, endswith, regex")?;
    let Some(input) = console.prompt("Enter operator [==]: ")? else {
        return Ok(Answer::Eof);
    };
    let operator = if input.is_empty() {
        Operator::Eq
    } else {
        match input.parse::<Operator>() {
            Ok(op) => op,
            Err(_) => {
                console.error(&format!("Invalid operator: {}", input))?;
                return Ok(Answer::Invalid);
            }
        }
    };

    let Some(value) = console.prompt("Enter value to search for: ")? else {
        return Ok(Answer::Eof);
    };

    let mut case_sensitive = false;
    if operator.is_text() {
        match console.confirm("Case-sensitive search?", false)? {
            Some(answer) => case_sensitive = answer,
            None => return Ok(Answer::Eof),
        }
    }

    Ok(Answer::Given(
        Condition::new(field.header(), operator, value).case_sensitive(case_sensitive),
    ))
}

/// First condition is mandatory; later ones are skipped when invalid.
fn read_conditions<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &FilterEngine,
) -> io::Result<Answer<(Vec<Condition>, BooleanOp)>> {
    writeln!(console.out(), "\n{}", "First Search Condition".bold())?;
    let mut conditions = match read_condition(console, engine)? {
        Answer::Given(condition) => vec![condition],
        Answer::Invalid => return Ok(Answer::Invalid),
        Answer::Eof => return Ok(Answer::Eof),
    };

    let mut boolean_op = BooleanOp::And;
    loop {
        match console.confirm("Add another condition?", false)? {
            Some(true) => {}
            Some(false) => break,
            None => return Ok(Answer::Eof),
        }

        if conditions.len() == 1 {
            let Some(input) = console.prompt("Combine conditions with (AND/OR) [AND]: ")? else {
                return Ok(Answer::Eof);
            };
            boolean_op = if input.is_empty() {
                BooleanOp::And
            } else {
                match input.parse() {
                    Ok(op) => op,
                    Err(_) => {
                        console.warning(&format!("Unknown operator '{}', using AND", input))?;
                        BooleanOp::And
                    }
                }
            };
        }

        match read_condition(console, engine)? {
            Answer::Given(condition) => conditions.push(condition),
            Answer::Invalid => {}
            Answer::Eof => return Ok(Answer::Eof),
        }
    }

    Ok(Answer::Given((conditions, boolean_op)))
}

fn post_search<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    engine: &mut FilterEngine,
) -> io::Result<Next> {
    loop {
        writeln!(console.out(), "\n{}", "Post-Search Options:".bold())?;
        writeln!(console.out(), "1. Export to CSV")?;
        writeln!(console.out(), "2. Show summary statistics")?;
        writeln!(console.out(), "3. Show unique values for a column")?;
        writeln!(console.out(), "4. Refine search (search within results)")?;
        writeln!(console.out(), "5. Clear results and start new search")?;
        writeln!(console.out(), "6. Return to main menu")?;

        let Some(choice) = console.prompt_number::<u32>("Enter choice (1-6): ")? else {
            return Ok(Next::Leave(Flow::Exit));
        };

        match choice {
            1 => {
                let prompt = format!("Export filename [{}]: ", DEFAULT_EXPORT_FILE);
                let Some(input) = console.prompt(&prompt)? else {
                    return Ok(Next::Leave(Flow::Exit));
                };
                let path = export_path(&input);
                if engine.export_csv(&path, None) {
                    console.success(&format!("Results exported to {}", path.display()))?;
                } else {
                    console.error("Export failed")?;
                }
            }
            2 => {
                let stats = engine.summary_statistics(None);
                display::write_statistics(console.out(), &stats)?;
            }
            3 => match read_column(console, engine)? {
                Answer::Given(field) => {
                    let values = engine.unique_values(field.header(), None);
                    display::write_unique_values(console.out(), field.header(), &values)?;
                }
                Answer::Invalid => {}
                Answer::Eof => return Ok(Next::Leave(Flow::Exit)),
            },
            4 => return Ok(Next::Refine),
            5 => {
                engine.clear();
                console.success("Results cleared.")?;
                return Ok(Next::NewSearch);
            }
            6 => return Ok(Next::Leave(Flow::Continue)),
            _ => console.error("Invalid choice. Please enter a number between 1 and 6.")?,
        }
    }
}

/// Resolve an export filename, appending `.csv` when it has no extension.
fn export_path(input: &str) -> PathBuf {
    if input.is_empty() {
        return PathBuf::from(DEFAULT_EXPORT_FILE);
    }
    let mut path = PathBuf::from(input);
    if path.extension().is_none() {
        path.set_extension("csv");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstat::{Record, Repository, SessionState};
    use std::io::Cursor;

    fn engine() -> FilterEngine {
        let rows = [
            ("2020", "Canada", "1000"),
            ("2020", "Ontario", "2000"),
            ("2021", "Quebec", "1500"),
            ("2021", "Alberta", "500"),
        ];
        let records: Vec<Record> = rows
            .iter()
            .map(|(date, geo, value)| {
                Record::new()
                    .with(Field::RefDate, *date)
                    .with(Field::Geo, *geo)
                    .with(Field::Value, *value)
            })
            .collect();
        FilterEngine::from_records(&records)
    }

    fn session(input: &str, engine: &mut FilterEngine) -> (Flow, String) {
        colored::control::set_override(false);
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let flow = run(&mut console, engine).unwrap();
        (flow, String::from_utf8(console.output().clone()).unwrap())
    }

    #[test]
    fn test_single_numeric_condition() {
        let mut engine = engine();
        let (flow, out) = session("n\nVALUE\n>\n1200\nn\n6\n", &mut engine);

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("Found 2 matching records"));
        assert_eq!(engine.last_results().unwrap().positions(), vec![1, 2]);
    }

    #[test]
    fn test_column_by_number_and_default_operator() {
        let mut engine = engine();
        let (_, out) = session("n\n2\n\nQuebec\nn\n6\n", &mut engine);

        assert!(out.contains("Found 1 matching records"));
        assert_eq!(engine.history()[0].conditions[0].operator, Operator::Eq);
    }

    #[test]
    fn test_or_combination() {
        let mut engine = engine();
        let input = "n\nGEO\n==\nCanada\ny\nOR\nGEO\n==\nAlberta\nn\n6\n";
        let (_, out) = session(input, &mut engine);

        assert!(out.contains("Found 2 matching records"));
        assert_eq!(engine.history()[0].boolean_op, BooleanOp::Or);
    }

    #[test]
    fn test_refine_then_return() {
        let mut engine = engine();
        let input = "n\nGEO\ncontains\na\nn\nn\n4\nREF_DATE\n==\n2021\nn\n6\n";
        let (_, out) = session(input, &mut engine);

        assert!(out.contains("Found 3 matching records"));
        assert!(out.contains("Found 1 matching records"));
        assert_eq!(engine.last_results().unwrap().positions(), vec![3]);
        assert!(engine.history()[1].refined);
    }

    #[test]
    fn test_clear_starts_new_search() {
        let mut engine = engine();
        let input = "n\nGEO\n==\nCanada\nn\n5\nREF_DATE\n==\n2021\nn\n6\n";
        let (_, out) = session(input, &mut engine);

        assert!(out.contains("Results cleared."));
        assert_eq!(engine.history().len(), 1);
        assert!(!engine.history()[0].refined);
        assert_eq!(engine.last_results().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_column_returns_to_menu() {
        let mut engine = engine();
        let (flow, out) = session("n\nPLANET\n", &mut engine);

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("Invalid column: PLANET"));
        assert_eq!(engine.state(), SessionState::Empty);
    }

    #[test]
    fn test_stats_unique_and_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut engine = engine();
        let input = format!(
            "y\nREF_DATE\n==\n2020\nn\n2\n3\nGEO\n1\n{}\n6\n",
            path.display()
        );
        let (_, out) = session(&input, &mut engine);

        assert!(out.contains("Operators:"));
        assert!(out.contains("Total records: 2"));
        assert!(out.contains("Unique values in GEO:"));
        assert!(out.contains("  1. Canada"));
        assert!(out.contains("Results exported to"));
        assert_eq!(Repository::new().load(&path, None).unwrap().len(), 2);
    }

    #[test]
    fn test_export_path_appends_extension() {
        assert_eq!(export_path(""), PathBuf::from("search_results.csv"));
        assert_eq!(export_path("ontario"), PathBuf::from("ontario.csv"));
        assert_eq!(export_path("out/data.txt"), PathBuf::from("out/data.txt"));
    }

    #[test]
    fn test_export_without_extension_writes_csv_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let stem = dir.path().join("matches");
        let mut engine = engine();
        let input = format!("n\nGEO\n==\nQuebec\nn\n1\n{}\n6\n", stem.display());
        let (_, out) = session(&input, &mut engine);

        assert!(out.contains("Results exported to"));
        let records = Repository::new().load(stem.with_extension("csv"), None).unwrap();
        assert_eq!(records[0].geo(), "Quebec");
        assert!(!stem.exists());
    }

    #[test]
    fn test_equality_does_not_fold_case() {
        let mut engine = engine();
        let (flow, out) = session("n\nGEO\n==\ncanada\nn\n", &mut engine);

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("No results found."));
    }

    #[test]
    fn test_no_results_and_eof() {
        let mut engine = engine();
        let (flow, out) = session("n\nGEO\n==\nMars\nn\n", &mut engine);
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("No results found."));

        let (flow, _) = session("n\nGEO\n", &mut engine);
        assert_eq!(flow, Flow::Exit);
    }
}
