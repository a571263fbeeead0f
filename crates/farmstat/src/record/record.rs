//! A single farm statistics row.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::Field;

/// Parse a cell as a number, treating empty or invalid text as `0.0`.
pub(crate) fn numeric_or_zero(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

macro_rules! record_fields {
    ($($field:ident, $setter:ident => $variant:ident;)*) => {
        /// One row of the dataset. Every field is free-form text at rest.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct Record {
            $(pub(crate) $field: String,)*
        }

        impl Record {
            $(
                pub fn $field(&self) -> &str {
                    &self.$field
                }

                pub fn $setter(&mut self, value: impl Into<String>) {
                    self.$field = value.into();
                }
            )*

            /// Get the value of a field.
            pub fn get(&self, field: Field) -> &str {
                match field {
                    $(Field::$variant => &self.$field,)*
                }
            }

            /// Replace the value of a field.
            pub fn set(&mut self, field: Field, value: impl Into<String>) {
                let value = value.into();
                match field {
                    $(Field::$variant => self.$field = value,)*
                }
            }
        }
    };
}

record_fields! {
    ref_date, set_ref_date => RefDate;
    geo, set_geo => Geo;
    dguid, set_dguid => Dguid;
    area_production_farm_value, set_area_production_farm_value => AreaProductionFarmValue;
    uom, set_uom => Uom;
    uom_id, set_uom_id => UomId;
    scalar_factor, set_scalar_factor => ScalarFactor;
    scalar_id, set_scalar_id => ScalarId;
    vector, set_vector => Vector;
    coordinate, set_coordinate => Coordinate;
    value, set_value => Value;
    status, set_status => Status;
    symbol, set_symbol => Symbol;
    terminated, set_terminated => Terminated;
    decimals, set_decimals => Decimals;
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Numeric view of a field; unparseable text counts as zero.
    pub fn numeric(&self, field: Field) -> f64 {
        numeric_or_zero(self.get(field))
    }

    /// Field values in CSV column order.
    pub fn to_csv_row(&self) -> Vec<&str> {
        Field::ALL.iter().map(|f| self.get(*f)).collect()
    }

    /// Build a record from cells in CSV column order. Missing cells are empty.
    pub fn from_csv_row<S: AsRef<str>>(cells: &[S]) -> Self {
        let mut record = Record::new();
        for (field, cell) in Field::ALL.iter().zip(cells) {
            record.set(*field, cell.as_ref());
        }
        record
    }

    /// Returns true if any field contains `needle`, ignoring case.
    pub(crate) fn matches_term(&self, needle_lower: &str, fields: &[Field]) -> bool {
        fields
            .iter()
            .any(|f| self.get(*f).to_lowercase().contains(needle_lower))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Farm Data Record:")?;
        writeln!(f, "  Year: {}", self.ref_date)?;
        writeln!(f, "  Location: {}", self.geo)?;
        writeln!(f, "  Type: {}", self.area_production_farm_value)?;
        writeln!(f, "  Value: {} {}", self.value, self.uom)?;
        writeln!(f, "  Vector: {}", self.vector)?;
        write!(f, "  Coordinate: {}", self.coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new()
            .with(Field::RefDate, "2024")
            .with(Field::Geo, "Test Location")
            .with(Field::AreaProductionFarmValue, "Production (hundredweight)")
            .with(Field::Uom, "Hundredweight")
            .with(Field::Vector, "v123")
            .with(Field::Coordinate, "1.1")
            .with(Field::Value, "1000")
    }

    #[test]
    fn test_accessors_and_mutators() {
        let mut record = sample();
        assert_eq!(record.geo(), "Test Location");
        assert_eq!(record.get(Field::Value), "1000");

        record.set_value("1200");
        record.set(Field::Geo, "Ontario");
        assert_eq!(record.value(), "1200");
        assert_eq!(record.geo(), "Ontario");
    }

    #[test]
    fn test_numeric_fallback() {
        let mut record = sample();
        assert_eq!(record.numeric(Field::Value), 1000.0);

        record.set_value("   ");
        assert_eq!(record.numeric(Field::Value), 0.0);
        record.set_value("n/a");
        assert_eq!(record.numeric(Field::Value), 0.0);
        record.set_value(" 12.5 ");
        assert_eq!(record.numeric(Field::Value), 12.5);
    }

    #[test]
    fn test_csv_row_mapping() {
        let record = sample();
        let row = record.to_csv_row();
        assert_eq!(row.len(), 15);
        assert_eq!(row[0], "2024");
        assert_eq!(row[10], "1000");

        let short = Record::from_csv_row(&["2020", "Canada"]);
        assert_eq!(short.geo(), "Canada");
        assert_eq!(short.decimals(), "");
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert!(text.contains("Year: 2024"));
        assert!(text.contains("Location: Test Location"));
        assert!(text.contains("Value: 1000 Hundredweight"));
    }
}
