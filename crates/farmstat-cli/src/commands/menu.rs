//! Menu command - interactive record manager.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use farmstat::{Field, Record, RecordService};

use super::{Flow, FAREWELL};
use crate::console::Console;
use crate::display;

/// Fields offered by the sort action, in menu order.
const SORT_FIELDS: [(Field, &str); 7] = [
    (Field::RefDate, "Reference date/year"),
    (Field::Geo, "Geographic location"),
    (Field::AreaProductionFarmValue, "Type of measurement"),
    (Field::Value, "Data value (numeric)"),
    (Field::Uom, "Unit of measurement"),
    (Field::Vector, "Vector identifier"),
    (Field::Coordinate, "Coordinate value (numeric)"),
];

/// Fields offered by the top-N action, in menu order.
const TOP_FIELDS: [(Field, &str); 3] = [
    (Field::Value, "Data value"),
    (Field::RefDate, "Reference date"),
    (Field::Geo, "Geographic location"),
];

const PREVIEW_ROWS: isize = 5;

pub fn run(
    data: PathBuf,
    max_records: usize,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = RecordService::new();

    if data.exists() {
        println!("Loading default dataset: {}", data.display());
        if !service.load_from_file(&data, Some(max_records)) {
            println!("{}", "Failed to load the default dataset.".red());
        }
    } else {
        let message = format!(
            "Dataset not found: {} (use option 1 to load a file)",
            data.display()
        );
        println!("{}", message.yellow());
    }

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Menu::new(console, service, data, max_records).run()?;
    Ok(())
}

/// Menu loop over a record service.
pub struct Menu<R, W> {
    console: Console<R, W>,
    service: RecordService,
    default_path: PathBuf,
    max_records: usize,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(
        console: Console<R, W>,
        service: RecordService,
        default_path: PathBuf,
        max_records: usize,
    ) -> Self {
        Self {
            console,
            service,
            default_path,
            max_records,
        }
    }

    /// Show the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.write_header()?;

        loop {
            self.write_menu()?;
            let Some(choice) = self.console.prompt("Enter your choice (1-11): ")? else {
                break;
            };

            let flow = match choice.parse::<u32>() {
                Ok(1) => self.load()?,
                Ok(2) => self.save()?,
                Ok(3) => self.view_one()?,
                Ok(4) => self.view_many()?,
                Ok(5) => self.create()?,
                Ok(6) => self.edit()?,
                Ok(7) => self.delete()?,
                Ok(8) => self.search()?,
                Ok(9) => self.sort()?,
                Ok(10) => self.top_n()?,
                Ok(11) => Flow::Exit,
                _ => {
                    self.console.error("Invalid choice. Please enter a number between 1 and 11.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.console.out(), "\n{}", FAREWELL.cyan().bold())
    }

    #[cfg(test)]
    fn service(&self) -> &RecordService {
        &self.service
    }

    #[cfg(test)]
    fn output(&self) -> String
    where
        W: AsRef<[u8]>,
    {
        String::from_utf8_lossy(self.console.output().as_ref()).into_owned()
    }

    fn write_header(&mut self) -> io::Result<()> {
        let rule = "=".repeat(80);
        let out = self.console.out();
        writeln!(out, "{}", rule)?;
        writeln!(out, "{}", "FARMSTAT RECORD MANAGER".bold())?;
        if let Some(source) = self.service.source() {
            writeln!(out, "Dataset: {}", source.file)?;
        }
        writeln!(out, "Records in memory: {}", self.service.record_count())?;
        writeln!(out, "{}", rule)
    }

    fn write_menu(&mut self) -> io::Result<()> {
        let out = self.console.out();
        writeln!(out, "\n{}", "--- Main Menu ---".cyan().bold())?;
        writeln!(out, "1. Load/Reload data from dataset")?;
        writeln!(out, "2. Save data to new CSV file")?;
        writeln!(out, "3. Display single record")?;
        writeln!(out, "4. Display multiple records")?;
        writeln!(out, "5. Create new record")?;
        writeln!(out, "6. Edit existing record")?;
        writeln!(out, "7. Delete record")?;
        writeln!(out, "8. Search records")?;
        writeln!(out, "9. Sort records")?;
        writeln!(out, "10. View top N records")?;
        writeln!(out, "11. Exit application")?;
        writeln!(out, "{}", "-".repeat(50))
    }

    /// Warn and return false when there is nothing to work on.
    fn require_data(&mut self) -> io::Result<bool> {
        if self.service.is_empty() {
            self.console.warning("No data in memory. Please load data first.")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn write_index_range(&mut self) -> io::Result<()> {
        let last = self.service.record_count().saturating_sub(1);
        writeln!(self.console.out(), "Available records: 0 to {}", last)
    }

    /// Prompt for an index that exists in the collection.
    fn read_index(&mut self, message: &str) -> io::Result<Option<Option<usize>>> {
        let Some(index) = self.console.prompt_number::<usize>(message)? else {
            return Ok(None);
        };
        if index >= self.service.record_count() {
            let last = self.service.record_count().saturating_sub(1);
            let notice = format!("Invalid index. Please enter a number between 0 and {last}");
            self.console.error(&notice)?;
            return Ok(Some(None));
        }
        Ok(Some(Some(index)))
    }

    fn load(&mut self) -> io::Result<Flow> {
        self.console.heading("Load Data")?;
        let Some(input) = self
            .console
            .prompt("Enter CSV filename (or press Enter for default): ")?
        else {
            return Ok(Flow::Exit);
        };
        let path = if input.is_empty() {
            self.default_path.clone()
        } else {
            PathBuf::from(input)
        };

        writeln!(self.console.out(), "Loading data from: {}", path.display())?;
        if self.service.load_from_file(&path, Some(self.max_records)) {
            let count = self.service.record_count();
            let shown = path.display();
            let message = format!("Successfully loaded {count} records from {shown}");
            self.console.success(&message)?;
        } else {
            self.console
                .error("Failed to load data. Please check the file path and try again.")?;
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> io::Result<Flow> {
        self.console.heading("Save Data")?;
        if self.service.is_empty() {
            self.console.warning("No data in memory to save. Please load data first.")?;
            return Ok(Flow::Continue);
        }

        let Some(input) = self
            .console
            .prompt("Enter output filename (e.g., 'output.csv'): ")?
        else {
            return Ok(Flow::Exit);
        };
        if input.is_empty() {
            self.console.error("Filename cannot be empty.")?;
            return Ok(Flow::Continue);
        }

        if self.service.save_to_file(Path::new(&input)) {
            let count = self.service.record_count();
            self.console
                .success(&format!("Successfully saved {count} records to {input}"))?;
        } else {
            self.console.error("Failed to save data.")?;
        }
        Ok(Flow::Continue)
    }

    fn view_one(&mut self) -> io::Result<Flow> {
        self.console.heading("Display Single Record")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        self.write_index_range()?;
        match self.read_index("Enter record index: ")? {
            None => return Ok(Flow::Exit),
            Some(None) => {}
            Some(Some(index)) => {
                if let Some(record) = self.service.get(index) {
                    display::write_record(self.console.out(), index, &record)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn view_many(&mut self) -> io::Result<Flow> {
        self.console.heading("Display Multiple Records")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        writeln!(self.console.out(), "Display options:")?;
        writeln!(self.console.out(), "1. Display all records")?;
        writeln!(self.console.out(), "2. Display records by range")?;
        writeln!(self.console.out(), "3. Display first N records")?;
        let Some(choice) = self.console.prompt("Enter choice (1-3): ")? else {
            return Ok(Flow::Exit);
        };

        let count = self.service.record_count();
        let last = count as isize - 1;
        let records = match choice.as_str() {
            "1" => {
                writeln!(self.console.out(), "\nDisplaying all {} records:", count)?;
                self.service.range(0, last)
            }
            "2" => {
                let Some(start) = self
                    .console
                    .prompt_number::<isize>(&format!("Enter start index (0 to {}): ", last))?
                else {
                    return Ok(Flow::Exit);
                };
                let Some(end) = self
                    .console
                    .prompt_number::<isize>(&format!("Enter end index (0 to {}): ", last))?
                else {
                    return Ok(Flow::Exit);
                };
                let records = self.service.range(start, end);
                if records.is_empty() {
                    self.console.warning("No records found in the specified range.")?;
                    return Ok(Flow::Continue);
                }
                writeln!(
                    self.console.out(),
                    "\nDisplaying records {} to {}:",
                    start,
                    end
                )?;
                records
            }
            "3" => {
                let message = format!("Enter number of records to display (max {}): ", count);
                let Some(n) = self.console.prompt_number::<usize>(&message)? else {
                    return Ok(Flow::Exit);
                };
                if n == 0 {
                    self.console.error("Number must be greater than 0.")?;
                    return Ok(Flow::Continue);
                }
                let records = self.service.range(0, n.min(count) as isize - 1);
                writeln!(
                    self.console.out(),
                    "\nDisplaying first {} records:",
                    records.len()
                )?;
                records
            }
            _ => {
                self.console.error("Invalid choice.")?;
                return Ok(Flow::Continue);
            }
        };

        display::write_records(self.console.out(), &records)?;
        Ok(Flow::Continue)
    }

    fn create(&mut self) -> io::Result<Flow> {
        self.console.heading("Create New Record")?;
        writeln!(self.console.out(), "Enter details for the new record:")?;

        let mut record = Record::new();
        for field in Field::ALL {
            let Some(value) = self.console.prompt(&format!("{}: ", field.label()))? else {
                return Ok(Flow::Exit);
            };
            record.set(field, value);
        }

        self.service.add(record);
        let count = self.service.record_count();
        let message = format!("Successfully created new record. Total records: {count}");
        self.console.success(&message)?;
        Ok(Flow::Continue)
    }

    fn edit(&mut self) -> io::Result<Flow> {
        self.console.heading("Edit Record")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        self.write_index_range()?;
        let index = match self.read_index("Enter record index to edit: ")? {
            None => return Ok(Flow::Exit),
            Some(None) => return Ok(Flow::Continue),
            Some(Some(index)) => index,
        };
        let Some(mut record) = self.service.get(index) else {
            return Ok(Flow::Continue);
        };

        writeln!(self.console.out(), "\nCurrent record #{}:", index)?;
        writeln!(self.console.out(), "{}", record)?;
        writeln!(
            self.console.out(),
            "\nEnter new values (press Enter to keep current value):"
        )?;

        for field in Field::ALL {
            let message = format!("{} [{}]: ", field.label(), record.get(field));
            let Some(value) = self.console.prompt(&message)? else {
                return Ok(Flow::Exit);
            };
            if !value.is_empty() {
                record.set(field, value);
            }
        }

        if self.service.update(index, record) {
            self.console.success(&format!("Successfully updated record #{}", index))?;
        } else {
            self.console.error("Failed to update record.")?;
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        self.console.heading("Delete Record")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        self.write_index_range()?;
        let index = match self.read_index("Enter record index to delete: ")? {
            None => return Ok(Flow::Exit),
            Some(None) => return Ok(Flow::Continue),
            Some(Some(index)) => index,
        };
        if let Some(record) = self.service.get(index) {
            writeln!(self.console.out(), "\nRecord to delete #{}:", index)?;
            writeln!(self.console.out(), "{}", record)?;
        }

        match self.console.confirm("\nAre you sure you want to delete this record?", false)? {
            None => return Ok(Flow::Exit),
            Some(false) => writeln!(self.console.out(), "Delete operation cancelled.")?,
            Some(true) => {
                if self.service.delete(index) {
                    let count = self.service.record_count();
                    let message = format!("Successfully deleted record. Total records: {count}");
                    self.console.success(&message)?;
                } else {
                    self.console.error("Failed to delete record.")?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        self.console.heading("Search Records")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        writeln!(
            self.console.out(),
            "1. Quick search (text across location, date, type and value)"
        )?;
        writeln!(
            self.console.out(),
            "2. Advanced filter (conditions with AND/OR logic)"
        )?;
        let Some(choice) = self.console.prompt("Enter choice (1-2) [1]: ")? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "" | "1" => self.quick_search(),
            "2" => {
                let mut engine = self.service.filter_engine();
                super::search::run(&mut self.console, &mut engine)
            }
            _ => {
                self.console.error("Invalid choice.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn quick_search(&mut self) -> io::Result<Flow> {
        let Some(term) = self.console.prompt("Enter search term: ")? else {
            return Ok(Flow::Exit);
        };
        if term.is_empty() {
            self.console.error("Search term cannot be empty.")?;
            return Ok(Flow::Continue);
        }

        let results = self.service.search(&term);
        if results.is_empty() {
            self.console
                .warning(&format!("No records found matching '{}'", term))?;
        } else {
            writeln!(
                self.console.out(),
                "\nFound {} matching records:",
                results.len()
            )?;
            display::write_records(self.console.out(), &results)?;
        }
        Ok(Flow::Continue)
    }

    /// Read an order answer, falling back to `default_ascending` on empty input.
    fn read_order(&mut self, default_ascending: bool) -> io::Result<Option<bool>> {
        let hint = if default_ascending { "A" } else { "D" };
        let message = format!("Sort order - (A)scending or (D)escending? [{}]: ", hint);
        let Some(answer) = self.console.prompt(&message)? else {
            return Ok(None);
        };
        Ok(Some(match answer.to_uppercase().as_str() {
            "A" => true,
            "D" => false,
            _ => default_ascending,
        }))
    }

    fn sort(&mut self) -> io::Result<Flow> {
        self.console.heading("Sort Records")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        writeln!(
            self.console.out(),
            "Records are sorted in place with a stable sort; ties keep their order."
        )?;
        writeln!(self.console.out(), "\nAvailable fields to sort by:")?;
        for (i, (field, description)) in SORT_FIELDS.iter().enumerate() {
            writeln!(
                self.console.out(),
                "  {}. {:<28} - {}",
                i + 1,
                field.name(),
                description
            )?;
        }

        let Some(choice) = self.console.prompt("\nEnter field number to sort by (1-7): ")? else {
            return Ok(Flow::Exit);
        };
        let Some((field, _)) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| SORT_FIELDS.get(i))
        else {
            self.console.error("Invalid choice.")?;
            return Ok(Flow::Continue);
        };
        let field = *field;

        let Some(ascending) = self.read_order(true)? else {
            return Ok(Flow::Exit);
        };
        let order = if ascending { "ascending" } else { "descending" };
        writeln!(
            self.console.out(),
            "\nSorting records by '{}' in {} order...",
            field.name(),
            order
        )?;

        if !self.service.sort(field.name(), ascending) {
            self.console.error("Failed to sort records. Please try again.")?;
            return Ok(Flow::Continue);
        }
        let count = self.service.record_count();
        self.console.success(&format!("Successfully sorted {} records!", count))?;

        match self.console.confirm("\nDisplay first 5 records to confirm?", false)? {
            None => return Ok(Flow::Exit),
            Some(true) => {
                let preview = self.service.range(0, PREVIEW_ROWS - 1);
                writeln!(
                    self.console.out(),
                    "\nFirst {} records after sorting:",
                    preview.len()
                )?;
                display::write_records(self.console.out(), &preview)?;
            }
            Some(false) => {}
        }
        Ok(Flow::Continue)
    }

    fn top_n(&mut self) -> io::Result<Flow> {
        self.console.heading("Top N Records")?;
        if !self.require_data()? {
            return Ok(Flow::Continue);
        }

        let count = self.service.record_count();
        let message = format!("How many top records to display? (1-{}): ", count);
        let Some(n) = self.console.prompt_number::<usize>(&message)? else {
            return Ok(Flow::Exit);
        };
        if n == 0 || n > count {
            self.console
                .error(&format!("Please enter a number between 1 and {}", count))?;
            return Ok(Flow::Continue);
        }

        writeln!(self.console.out(), "\nSort by:")?;
        for (i, (field, description)) in TOP_FIELDS.iter().enumerate() {
            writeln!(
                self.console.out(),
                "  {}. {:<10} - {}",
                i + 1,
                field.name(),
                description
            )?;
        }
        let Some(choice) = self.console.prompt("Enter choice (1-3) [1]: ")? else {
            return Ok(Flow::Exit);
        };
        let field = match choice.as_str() {
            "2" => Field::RefDate,
            "3" => Field::Geo,
            _ => Field::Value,
        };

        let Some(ascending) = self.read_order(field != Field::Value)? else {
            return Ok(Flow::Exit);
        };

        let top = self.service.top_n(n, field.name(), ascending);
        let order = if ascending { "ascending" } else { "descending" };
        writeln!(
            self.console.out(),
            "\nTop {} records by {} ({}):",
            top.len(),
            field.name(),
            order
        )?;
        writeln!(self.console.out(), "{}", "=".repeat(60))?;
        for (rank, record) in top.iter().enumerate() {
            writeln!(self.console.out(), "\n{}", format!("#{}:", rank + 1).bold())?;
            writeln!(self.console.out(), "{}", record)?;
        }
        Ok(Flow::Continue)
    }
}
