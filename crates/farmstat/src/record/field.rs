//! The fixed set of columns every record carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FarmError;

/// One of the fifteen columns of a farm statistics dataset.
///
/// Variants are declared in CSV column order, so `Field::ALL` doubles as the
/// header order used when writing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Reference period (usually a year).
    RefDate,
    /// Geographic location.
    Geo,
    /// Geographic unique identifier.
    Dguid,
    /// Description of the measurement.
    AreaProductionFarmValue,
    /// Unit of measure.
    Uom,
    UomId,
    ScalarFactor,
    ScalarId,
    Vector,
    Coordinate,
    /// The observed value.
    Value,
    Status,
    Symbol,
    Terminated,
    Decimals,
}

impl Field {
    /// All fields in CSV column order.
    pub const ALL: [Field; 15] = [
        Field::RefDate,
        Field::Geo,
        Field::Dguid,
        Field::AreaProductionFarmValue,
        Field::Uom,
        Field::UomId,
        Field::ScalarFactor,
        Field::ScalarId,
        Field::Vector,
        Field::Coordinate,
        Field::Value,
        Field::Status,
        Field::Symbol,
        Field::Terminated,
        Field::Decimals,
    ];

    /// Column header as it appears in the CSV file.
    pub fn header(&self) -> &'static str {
        match self {
            Field::RefDate => "REF_DATE",
            Field::Geo => "GEO",
            Field::Dguid => "DGUID",
            Field::AreaProductionFarmValue => "Area, production and farm value of potatoes",
            Field::Uom => "UOM",
            Field::UomId => "UOM_ID",
            Field::ScalarFactor => "SCALAR_FACTOR",
            Field::ScalarId => "SCALAR_ID",
            Field::Vector => "VECTOR",
            Field::Coordinate => "COORDINATE",
            Field::Value => "VALUE",
            Field::Status => "STATUS",
            Field::Symbol => "SYMBOL",
            Field::Terminated => "TERMINATED",
            Field::Decimals => "DECIMALS",
        }
    }

    /// Attribute-style name (`ref_date`, `geo`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Field::RefDate => "ref_date",
            Field::Geo => "geo",
            Field::Dguid => "dguid",
            Field::AreaProductionFarmValue => "area_production_farm_value",
            Field::Uom => "uom",
            Field::UomId => "uom_id",
            Field::ScalarFactor => "scalar_factor",
            Field::ScalarId => "scalar_id",
            Field::Vector => "vector",
            Field::Coordinate => "coordinate",
            Field::Value => "value",
            Field::Status => "status",
            Field::Symbol => "symbol",
            Field::Terminated => "terminated",
            Field::Decimals => "decimals",
        }
    }

    /// Human-readable label for prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Field::RefDate => "Reference Date",
            Field::Geo => "Geographic Location",
            Field::Dguid => "Geographic Unique ID",
            Field::AreaProductionFarmValue => "Area/Production/Farm Value",
            Field::Uom => "Unit of Measurement",
            Field::UomId => "UOM ID",
            Field::ScalarFactor => "Scalar Factor",
            Field::ScalarId => "Scalar ID",
            Field::Vector => "Vector",
            Field::Coordinate => "Coordinate",
            Field::Value => "Value",
            Field::Status => "Status",
            Field::Symbol => "Symbol",
            Field::Terminated => "Terminated",
            Field::Decimals => "Decimals",
        }
    }

    /// Returns true if values of this field are compared as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Value | Field::Coordinate)
    }

    /// Zero-based position of the column.
    pub fn position(&self) -> usize {
        *self as usize
    }

    /// Resolve a header or attribute name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name) || f.header().eq_ignore_ascii_case(name))
    }
}

impl FromStr for Field {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::parse(s).ok_or_else(|| FarmError::InvalidField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_csv_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.position(), i);
        }
        assert_eq!(Field::ALL[0].header(), "REF_DATE");
        assert_eq!(Field::ALL[14].header(), "DECIMALS");
    }

    #[test]
    fn test_parse_accepts_headers_and_names() {
        assert_eq!(Field::parse("geo"), Some(Field::Geo));
        assert_eq!(Field::parse("GEO"), Some(Field::Geo));
        assert_eq!(Field::parse("  Value "), Some(Field::Value));
        assert_eq!(
            Field::parse("area, production and farm value of potatoes"),
            Some(Field::AreaProductionFarmValue)
        );
        assert_eq!(Field::parse("invalid_field"), None);
        assert!("nope".parse::<Field>().is_err());
    }

    #[test]
    fn test_numeric_fields() {
        let numeric: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_numeric()).collect();
        assert_eq!(numeric, vec![Field::Coordinate, Field::Value]);
    }
}
