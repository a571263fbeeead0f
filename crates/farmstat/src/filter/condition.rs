//! Search conditions and the operators that combine them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FarmError;

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Contains,
    StartsWith,
    EndsWith,
    Regex,
}

impl Operator {
    /// All operators, in menu order.
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Regex,
    ];

    /// Symbol or keyword used when typing the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Regex => "regex",
        }
    }

    /// Short description for help output.
    pub fn description(&self) -> &'static str {
        match self {
            Operator::Eq => "Exact match",
            Operator::Ne => "Not matching",
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => "Numeric comparison",
            Operator::Contains => "Text contains substring",
            Operator::StartsWith => "Text starts with",
            Operator::EndsWith => "Text ends with",
            Operator::Regex => "Regular expression",
        }
    }

    /// Returns true for the substring and pattern operators.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith | Operator::Regex
        )
    }

    /// Returns true for the ordering operators.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le)
    }
}

impl FromStr for Operator {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "==" | "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            ">=" => Ok(Operator::Ge),
            "<=" => Ok(Operator::Le),
            "contains" => Ok(Operator::Contains),
            "startswith" => Ok(Operator::StartsWith),
            "endswith" => Ok(Operator::EndsWith),
            "regex" => Ok(Operator::Regex),
            _ => Err(FarmError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the masks of several conditions are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BooleanOp {
    #[default]
    And,
    Or,
}

impl FromStr for BooleanOp {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" | "&&" => Ok(BooleanOp::And),
            "or" | "||" => Ok(BooleanOp::Or),
            _ => Err(FarmError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOp::And => f.write_str("AND"),
            BooleanOp::Or => f.write_str("OR"),
        }
    }
}

/// A single filter condition: `column operator value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Column header or field name.
    pub column: String,
    pub operator: Operator,
    pub value: String,
    /// Only consulted by text comparisons. Defaults to false.
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Condition {
    /// Create a case-insensitive condition.
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
            case_sensitive: false,
        }
    }

    /// Set case sensitivity.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Get a human-readable description of the condition.
    pub fn description(&self) -> String {
        let mut text = format!("{} {} '{}'", self.column, self.operator, self.value);
        if self.case_sensitive {
            text.push_str(" (case-sensitive)");
        }
        text
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Symbolic operators, longest first so `>=` wins over `>`.
const SYMBOLS: [&str; 7] = [">=", "<=", "!=", "==", ">", "<", "="];

impl FromStr for Condition {
    type Err = FarmError;

    /// Parse `COLUMN OP VALUE`.
    ///
    /// The operator is the first whitespace-separated token that names one;
    /// the column is everything before it and the value everything after.
    /// Symbolic operators may also be written without spaces (`VALUE>1200`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FarmError::InvalidCondition(s.to_string());

        let (column, operator, value) = match split_on_token(s) {
            Some(parts) => parts,
            None => split_on_symbol(s).ok_or_else(invalid)?,
        };

        let column = column.split_whitespace().collect::<Vec<_>>().join(" ");
        if column.is_empty() {
            return Err(invalid());
        }

        Ok(Condition::new(column, operator, value.trim()))
    }
}

fn split_on_token(s: &str) -> Option<(&str, Operator, &str)> {
    let mut offset = 0;
    for token in s.split_whitespace() {
        let start = offset + s[offset..].find(token)?;
        let end = start + token.len();
        if let Ok(operator) = token.parse::<Operator>() {
            return Some((&s[..start], operator, &s[end..]));
        }
        offset = end;
    }
    None
}

fn split_on_symbol(s: &str) -> Option<(&str, Operator, &str)> {
    let (start, symbol) = SYMBOLS
        .iter()
        .filter_map(|sym| s.find(sym).map(|pos| (pos, *sym)))
        // earliest position, then longest symbol
        .min_by_key(|(pos, sym)| (*pos, std::cmp::Reverse(sym.len())))?;
    let operator = symbol.parse().ok()?;
    Some((&s[..start], operator, &s[start + symbol.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip_symbols() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
        }
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("CONTAINS".parse::<Operator>().unwrap(), Operator::Contains);
        assert!("~".parse::<Operator>().is_err());
    }

    #[test]
    fn test_boolean_op_parse() {
        assert_eq!("and".parse::<BooleanOp>().unwrap(), BooleanOp::And);
        assert_eq!("OR".parse::<BooleanOp>().unwrap(), BooleanOp::Or);
        assert!("xor".parse::<BooleanOp>().is_err());
        assert_eq!(BooleanOp::default(), BooleanOp::And);
    }

    #[test]
    fn test_parse_spaced_condition() {
        let cond: Condition = "VALUE > 1200".parse().unwrap();
        assert_eq!(cond, Condition::new("VALUE", Operator::Gt, "1200"));

        let cond: Condition = "GEO contains Prince Edward".parse().unwrap();
        assert_eq!(cond.column, "GEO");
        assert_eq!(cond.operator, Operator::Contains);
        assert_eq!(cond.value, "Prince Edward");
    }

    #[test]
    fn test_parse_column_with_spaces() {
        let cond: Condition = "Area, production and farm value of potatoes startswith Seeded"
            .parse()
            .unwrap();
        assert_eq!(cond.column, "Area, production and farm value of potatoes");
        assert_eq!(cond.operator, Operator::StartsWith);
        assert_eq!(cond.value, "Seeded");
    }

    #[test]
    fn test_parse_compact_condition() {
        let cond: Condition = "VALUE>=1500".parse().unwrap();
        assert_eq!(cond, Condition::new("VALUE", Operator::Ge, "1500"));

        let cond: Condition = "GEO!=Canada".parse().unwrap();
        assert_eq!(cond, Condition::new("GEO", Operator::Ne, "Canada"));
    }

    #[test]
    fn test_parse_empty_value_and_errors() {
        let cond: Condition = "STATUS ==".parse().unwrap();
        assert_eq!(cond.value, "");

        assert!("GEO Ontario".parse::<Condition>().is_err());
        assert!("> 5".parse::<Condition>().is_err());
        assert!("".parse::<Condition>().is_err());
    }

    #[test]
    fn test_description() {
        let cond = Condition::new("GEO", Operator::Regex, "^O").case_sensitive(true);
        assert_eq!(cond.description(), "GEO regex '^O' (case-sensitive)");
    }
}
