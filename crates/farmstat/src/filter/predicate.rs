//! Compiled form of a condition, evaluated once per row.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use crate::record::{Field, Record};

use super::condition::{Condition, Operator};

/// Parse a cell as a finite number.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

enum Test {
    /// Exact, case-sensitive text equality.
    Equals { text: String, negate: bool },
    /// Ordering against a number; non-numeric cells never match.
    CompareNumber { threshold: f64, accept: fn(Ordering) -> bool },
    /// Ordering against text when the condition value is not a number.
    CompareText { threshold: String, accept: fn(Ordering) -> bool },
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    Pattern(Regex),
}

/// A condition bound to a resolved field.
pub(crate) struct Predicate {
    field: Field,
    case_sensitive: bool,
    test: Test,
}

impl Predicate {
    /// Compile a condition. Returns `None` when it can match nothing: an
    /// unknown column or an invalid regular expression.
    pub(crate) fn compile(condition: &Condition) -> Option<Self> {
        let Some(field) = Field::parse(&condition.column) else {
            log::warn!("unknown column '{}' matches no rows", condition.column);
            return None;
        };
        let case_sensitive = condition.case_sensitive;
        let fold = |s: &str| {
            if case_sensitive {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        };
        let value = condition.value.as_str();

        let test = match condition.operator {
            Operator::Eq | Operator::Ne => Test::Equals {
                text: value.to_string(),
                negate: condition.operator == Operator::Ne,
            },
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => {
                let accept = ordering_test(condition.operator);
                match parse_number(value) {
                    Some(threshold) => Test::CompareNumber { threshold, accept },
                    None => Test::CompareText {
                        threshold: value.to_string(),
                        accept,
                    },
                }
            }
            Operator::Contains => Test::Contains(fold(value)),
            Operator::StartsWith => Test::StartsWith(fold(value)),
            Operator::EndsWith => Test::EndsWith(fold(value)),
            Operator::Regex => {
                let pattern = RegexBuilder::new(value)
                    .case_insensitive(!case_sensitive)
                    .build();
                match pattern {
                    Ok(regex) => Test::Pattern(regex),
                    Err(e) => {
                        log::warn!("invalid regex '{value}' matches no rows: {e}");
                        return None;
                    }
                }
            }
        };

        Some(Self {
            field,
            case_sensitive,
            test,
        })
    }

    /// Evaluate the predicate against a record.
    pub(crate) fn matches(&self, record: &Record) -> bool {
        let cell = record.get(self.field);

        match &self.test {
            Test::Equals { text, negate } => (cell == text) != *negate,
            Test::CompareNumber { threshold, accept } => parse_number(cell)
                .and_then(|actual| actual.partial_cmp(threshold))
                .is_some_and(accept),
            Test::CompareText { threshold, accept } => accept(cell.cmp(threshold.as_str())),
            Test::Contains(needle) => self.fold(cell).contains(needle.as_str()),
            Test::StartsWith(needle) => self.fold(cell).starts_with(needle.as_str()),
            Test::EndsWith(needle) => self.fold(cell).ends_with(needle.as_str()),
            Test::Pattern(regex) => regex.is_match(cell),
        }
    }

    fn fold(&self, cell: &str) -> String {
        if self.case_sensitive {
            cell.to_string()
        } else {
            cell.to_lowercase()
        }
    }
}

fn ordering_test(operator: Operator) -> fn(Ordering) -> bool {
    match operator {
        Operator::Gt => Ordering::is_gt,
        Operator::Lt => Ordering::is_lt,
        Operator::Ge => Ordering::is_ge,
        _ => Ordering::is_le,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(geo: &str, value: &str) -> Record {
        Record::new().with(Field::Geo, geo).with(Field::Value, value)
    }

    fn check(condition: Condition, record: &Record) -> bool {
        Predicate::compile(&condition).is_some_and(|p| p.matches(record))
    }

    fn holds(record: &Record, column: &str, operator: Operator, value: &str) -> bool {
        check(Condition::new(column, operator, value), record)
    }

    #[test]
    fn test_equality_is_exact() {
        let record = rec("Ontario", "1000");
        assert!(holds(&record, "GEO", Operator::Eq, "Ontario"));
        assert!(holds(&record, "VALUE", Operator::Eq, "1000"));
        assert!(!holds(&record, "GEO", Operator::Eq, "ontario"));
        assert!(!holds(&record, "VALUE", Operator::Eq, "1000.0"));
        assert!(holds(&record, "GEO", Operator::Ne, "ONTARIO"));
        assert!(holds(&record, "VALUE", Operator::Ne, "1e3"));
        assert!(!holds(&record, "GEO", Operator::Ne, "Ontario"));
    }

    #[test]
    fn test_numeric_ordering_excludes_non_numbers() {
        assert!(holds(&rec("A", "2000"), "VALUE", Operator::Gt, "1200"));
        assert!(!holds(&rec("A", "1200"), "VALUE", Operator::Gt, "1200"));
        assert!(holds(&rec("A", "1200"), "VALUE", Operator::Ge, "1200"));
        assert!(holds(&rec("A", " 500 "), "VALUE", Operator::Le, "1200"));
        assert!(!holds(&rec("A", ""), "VALUE", Operator::Lt, "1200"));
        assert!(!holds(&rec("A", "x"), "VALUE", Operator::Lt, "1200"));
    }

    #[test]
    fn test_text_ordering_when_value_not_numeric() {
        assert!(holds(&rec("Ontario", "1"), "GEO", Operator::Gt, "M"));
        assert!(!holds(&rec("Alberta", "1"), "GEO", Operator::Gt, "M"));
    }

    #[test]
    fn test_substring_operators() {
        let record = rec("Prince Edward Island", "1");
        assert!(holds(&record, "GEO", Operator::Contains, "EDWARD"));
        assert!(holds(&record, "GEO", Operator::StartsWith, "prince"));
        assert!(holds(&record, "GEO", Operator::EndsWith, "island"));
        assert!(!check(
            Condition::new("GEO", Operator::EndsWith, "island").case_sensitive(true),
            &record
        ));
    }

    #[test]
    fn test_regex() {
        let record = rec("Alberta", "1");
        assert!(holds(&record, "GEO", Operator::Regex, "^[a-c]"));
        assert!(!check(
            Condition::new("GEO", Operator::Regex, "^[a-c]").case_sensitive(true),
            &record
        ));
        let unbalanced = Condition::new("GEO", Operator::Regex, "([");
        assert!(Predicate::compile(&unbalanced).is_none());
    }

    #[test]
    fn test_unknown_column_compiles_to_nothing() {
        let condition = Condition::new("NOPE", Operator::Eq, "1");
        assert!(Predicate::compile(&condition).is_none());
    }
}
