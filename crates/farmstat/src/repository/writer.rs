//! Writing records to CSV files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{FarmError, Result};
use crate::record::{Field, Record};

use super::{Repository, UTF8_BOM};

impl Repository {
    /// Save records to a CSV file, overwriting it.
    ///
    /// Returns `Ok(false)` without touching the file system when `records`
    /// is empty.
    pub fn save(&self, records: &[Record], path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        if records.is_empty() {
            log::warn!("no records to save to '{}'", path.display());
            return Ok(false);
        }

        self.export(records, path)?;
        log::debug!("saved {} records to '{}'", records.len(), path.display());
        Ok(true)
    }

    /// Write records to a CSV file, overwriting it. An empty slice still
    /// produces a header row.
    pub fn export<'a>(
        &self,
        records: impl IntoIterator<Item = &'a Record>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|e| FarmError::from_io(path, e))?;
        let mut writer = BufWriter::new(file);

        if self.config.write_bom {
            writer
                .write_all(UTF8_BOM)
                .map_err(|e| FarmError::from_io(path, e))?;
        }

        write_csv_with(records, &mut writer, self.config.delimiter)?;
        writer.flush().map_err(|e| FarmError::from_io(path, e))?;

        Ok(())
    }
}

/// Write a header row and one row per record, in `Field::ALL` order.
pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a Record>,
    writer: W,
) -> Result<()> {
    write_csv_with(records, writer, b',')
}

fn write_csv_with<'a, W: Write>(
    records: impl IntoIterator<Item = &'a Record>,
    writer: W,
    delimiter: u8,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(Field::ALL.iter().map(|f| f.header()))?;
    for record in records {
        csv_writer.write_record(record.to_csv_row())?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_header_and_quoting() {
        let record = Record::new()
            .with(Field::Geo, "Prince Edward Island")
            .with(Field::AreaProductionFarmValue, "Production, total")
            .with(Field::Value, "1500");

        let mut buffer = Vec::new();
        write_csv([&record], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "REF_DATE,GEO,DGUID,\"Area, production and farm value of potatoes\",UOM,UOM_ID,SCALAR_FACTOR,SCALAR_ID,VECTOR,COORDINATE,VALUE,STATUS,SYMBOL,TERMINATED,DECIMALS"
        );
        assert_eq!(
            lines.next().unwrap(),
            ",Prince Edward Island,,\"Production, total\",,,,,,,1500,,,,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let records = vec![
            Record::new().with(Field::Geo, "Canada").with(Field::Value, "1000"),
            Record::new().with(Field::Geo, "Ontario").with(Field::Status, "E"),
        ];

        let mut buffer = UTF8_BOM.to_vec();
        write_csv(&records, &mut buffer).unwrap();

        let loaded = Repository::new().parse_bytes(&buffer, None).unwrap();
        assert_eq!(loaded, records);
    }
}
