//! Record ordering used by sorting and top-N queries.

use std::cmp::Ordering;

use crate::record::{Field, Record};

/// Compare two records by `field`, falling back to the reference date.
///
/// Numeric fields compare as numbers (unparseable text counts as zero),
/// everything else compares case-insensitively. Descending order reverses
/// the whole comparison, so ties on both keys still compare equal and a
/// stable sort keeps their original order.
pub(crate) fn compare_records(a: &Record, b: &Record, field: Field, ascending: bool) -> Ordering {
    let primary = if field.is_numeric() {
        // numeric() never returns NaN
        a.numeric(field)
            .partial_cmp(&b.numeric(field))
            .unwrap_or(Ordering::Equal)
    } else {
        compare_text(a.get(field), b.get(field))
    };

    let ordering = primary.then_with(|| compare_text(a.ref_date(), b.ref_date()));

    if ascending { ordering } else { ordering.reverse() }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(geo: &str, value: &str, date: &str) -> Record {
        Record::new()
            .with(Field::Geo, geo)
            .with(Field::Value, value)
            .with(Field::RefDate, date)
    }

    #[test]
    fn test_numeric_comparison() {
        let a = rec("A", "900", "2020");
        let b = rec("B", "1000", "2020");
        assert_eq!(compare_records(&a, &b, Field::Value, true), Ordering::Less);
        assert_eq!(
            compare_records(&a, &b, Field::Value, false),
            Ordering::Greater
        );
    }

    #[test]
    fn test_text_comparison_ignores_case() {
        let a = rec("alberta", "1", "2020");
        let b = rec("Ontario", "1", "2020");
        assert_eq!(compare_records(&a, &b, Field::Geo, true), Ordering::Less);
    }

    #[test]
    fn test_date_breaks_ties() {
        let a = rec("Canada", "5", "2021");
        let b = rec("Canada", "5", "2020");
        assert_eq!(compare_records(&a, &b, Field::Geo, true), Ordering::Greater);
        assert_eq!(compare_records(&a, &b, Field::Value, false), Ordering::Less);
    }

    #[test]
    fn test_unparseable_numbers_count_as_zero() {
        let a = rec("A", "x", "2020");
        let b = rec("B", "0", "2020");
        let c = rec("C", "  ", "2020");
        assert_eq!(compare_records(&a, &b, Field::Value, true), Ordering::Equal);
        assert_eq!(compare_records(&a, &c, Field::Value, true), Ordering::Equal);
    }
}
