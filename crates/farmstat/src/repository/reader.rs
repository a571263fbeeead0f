//! Loading records from CSV files.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{FarmError, Result};
use crate::record::{Field, Record};

use super::source::DatasetInfo;
use super::{Repository, UTF8_BOM};

/// Record cap used by the console when none is given.
pub const DEFAULT_MAX_RECORDS: usize = 100;

impl Repository {
    /// Load up to `max_records` records from a CSV file (`None` = read to EOF).
    ///
    /// Columns are matched by header name. Extra columns are ignored and
    /// missing ones read as empty strings.
    pub fn load(&self, path: impl AsRef<Path>, max_records: Option<usize>) -> Result<Vec<Record>> {
        self.load_with_info(path, max_records)
            .map(|(records, _)| records)
    }

    /// Load records and describe the file they came from.
    pub fn load_with_info(
        &self,
        path: impl AsRef<Path>,
        max_records: Option<usize>,
    ) -> Result<(Vec<Record>, DatasetInfo)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| FarmError::from_io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let records = self.parse_bytes(&contents, max_records)?;
        log::debug!("loaded {} records from '{}'", records.len(), path.display());

        let info = DatasetInfo::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            records.len(),
        );

        Ok((records, info))
    }

    /// Parse CSV bytes into records.
    pub(crate) fn parse_bytes(
        &self,
        bytes: &[u8],
        max_records: Option<usize>,
    ) -> Result<Vec<Record>> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(|e| FarmError::Parse {
            row: 0,
            message: e.to_string(),
        })?;

        // Column index in the file for each field, in Field::ALL order
        let columns: Vec<Option<usize>> = Field::ALL
            .iter()
            .map(|field| headers.iter().position(|h| h.trim() == field.header()))
            .collect();

        let mut records = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if max_records.is_some_and(|max| row_idx >= max) {
                break;
            }

            let row = result.map_err(|e| FarmError::Parse {
                row: row_idx + 1,
                message: e.to_string(),
            })?;

            let mut record = Record::new();
            for (field, column) in Field::ALL.iter().zip(&columns) {
                if let Some(value) = column.and_then(|c| row.get(c)) {
                    record.set(*field, value);
                }
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "REF_DATE,GEO,DGUID,\"Area, production and farm value of potatoes\",UOM,UOM_ID,SCALAR_FACTOR,SCALAR_ID,VECTOR,COORDINATE,VALUE,STATUS,SYMBOL,TERMINATED,DECIMALS";

    #[test]
    fn test_parse_full_rows() {
        let data = format!(
            "{HEADER}\n1908,Canada,2016A000011124,Seeded area (acres),Acres,28,units,0,v47140,1.1,504000,,,,0\n"
        );
        let records = Repository::new().parse_bytes(data.as_bytes(), None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].geo(), "Canada");
        assert_eq!(
            records[0].area_production_farm_value(),
            "Seeded area (acres)"
        );
        assert_eq!(records[0].value(), "504000");
        assert_eq!(records[0].decimals(), "0");
    }

    #[test]
    fn test_bom_and_missing_columns() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice(b"GEO,VALUE,EXTRA\nOntario,2000,ignored\nQuebec\n");
        let records = Repository::new().parse_bytes(&data, None).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].geo(), "Ontario");
        assert_eq!(records[0].value(), "2000");
        assert_eq!(records[0].ref_date(), "");
        assert_eq!(records[1].geo(), "Quebec");
        assert_eq!(records[1].value(), "");
    }

    #[test]
    fn test_max_records_cap() {
        let data = "GEO\nA\nB\nC\nD\n";
        let repo = Repository::new();

        assert_eq!(repo.parse_bytes(data.as_bytes(), Some(2)).unwrap().len(), 2);
        assert_eq!(repo.parse_bytes(data.as_bytes(), Some(0)).unwrap().len(), 0);
        assert_eq!(repo.parse_bytes(data.as_bytes(), None).unwrap().len(), 4);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let data = b"GEO,VALUE\n\xff\xfe,1\n";
        let err = Repository::new().parse_bytes(data, None).unwrap_err();
        assert!(matches!(err, FarmError::Parse { row: 1, .. }));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        let records = Repository::new().parse_bytes(b"", None).unwrap();
        assert!(records.is_empty());
    }
}
