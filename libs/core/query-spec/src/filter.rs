use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::QueryError;
use crate::operator::Operator;

/// `<column><operator><value>`.
///
/// The column is matched lazily so the first operator wins. Symbolic operators
/// may touch the column (`age>=18`); keyword operators need whitespace before
/// them and a word boundary after, so a column such as `LINK` is never split
/// into `L` + `IN`. Inside each group the longer tokens are listed first.
static FILTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\S+?)(?:\s*(==|!=|>=|<=|>|<)|\s+(NOT\s+BETWEEN|NOT\s+IN|BETWEEN|ILIKE|LIKE|IN)\b)(.*)$",
    )
    .unwrap()
});

/// Characters that may not appear in a column name.
const OPERATOR_CHARS: [char; 4] = ['=', '!', '<', '>'];

/// Operator words that are never a column on their own, so `NOT IN x` is not
/// read as column `NOT` with operator `IN`.
const RESERVED_WORDS: [&str; 5] = ["NOT", "IN", "LIKE", "ILIKE", "BETWEEN"];

/// One `column operator value` constraint taken from a `filter` token.
///
/// The value is kept as the trimmed raw string. How it is interpreted (split
/// into a list, wrapped in wildcards, converted to a typed value) is up to the
/// persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    column: String,
    operator: Operator,
    value: String,
}

impl Filter {
    /// Builds a filter without going through the token grammar.
    ///
    /// Used to force extra constraints onto a query, e.g. restricting it to
    /// one id.
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Parses a raw `filter` token such as `name == admin` or `age>=18`.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let token = raw.trim();
        let malformed = || QueryError::MalformedFilter {
            token: raw.to_string(),
        };

        let captures = FILTER_PATTERN.captures(token).ok_or_else(malformed)?;

        let column = &captures[1];
        if column.contains(OPERATOR_CHARS) || RESERVED_WORDS.contains(&column) {
            return Err(malformed());
        }

        let operator = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| normalize_keyword(m.as_str()))
            .and_then(|op| op.parse::<Operator>().ok())
            .ok_or_else(malformed)?;

        let value = captures[4].trim();
        if value.is_empty() {
            return Err(QueryError::EmptyFilterValue {
                token: raw.to_string(),
            });
        }

        Ok(Self::new(column, operator, value))
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Splits a list value (`IN`, `BETWEEN`, ...) on `delimiter`.
    ///
    /// One pair of enclosing parentheses is dropped, so `(a, b)` and `a,b`
    /// give the same parts. Parts are trimmed and empty parts skipped.
    pub fn split(&self, delimiter: char) -> Vec<&str> {
        let value = self.value.trim();
        let inner = value
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .unwrap_or(value);

        inner
            .split(delimiter)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }
}

/// Collapses the whitespace inside `NOT  IN` style keywords.
fn normalize_keyword(op: &str) -> String {
    op.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl FromStr for Filter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator.as_str().starts_with(char::is_alphabetic) {
            write!(f, "{} {} {}", self.column, self.operator, self.value)
        } else {
            write!(f, "{}{}{}", self.column, self.operator, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Filter {
        Filter::parse(raw).unwrap_or_else(|e| panic!("{raw}: {e}"))
    }

    #[test]
    fn parses_equality_without_spaces() {
        let filter = parse("name==admin");
        assert_eq!(filter.column(), "name");
        assert_eq!(filter.operator(), Operator::Equal);
        assert_eq!(filter.value(), "admin");
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let filter = parse("  name  ==  super admin  ");
        assert_eq!(filter.column(), "name");
        assert_eq!(filter.value(), "super admin");
    }

    #[test]
    fn greater_or_equal_is_not_split() {
        let filter = parse("age>=18");
        assert_eq!(filter.operator(), Operator::GreaterThanOrEqual);
        assert_eq!(filter.value(), "18");

        let filter = parse("age<=18");
        assert_eq!(filter.operator(), Operator::LessThanOrEqual);
        assert_eq!(filter.value(), "18");
    }

    #[test]
    fn strict_comparisons() {
        assert_eq!(parse("created_at>2023-01-01").operator(), Operator::GreaterThan);
        assert_eq!(parse("created_at < 2023-01-01").operator(), Operator::LessThan);
        assert_eq!(parse("name!=admin").operator(), Operator::NotEqual);
    }

    #[test]
    fn keyword_operators() {
        let filter = parse("status NOT IN active,pending");
        assert_eq!(filter.column(), "status");
        assert_eq!(filter.operator(), Operator::NotIn);
        assert_eq!(filter.value(), "active,pending");

        assert_eq!(parse("status IN a,b").operator(), Operator::In);
        assert_eq!(parse("name LIKE adm").operator(), Operator::Like);
        assert_eq!(parse("name ILIKE adm").operator(), Operator::ILike);
        assert_eq!(parse("age BETWEEN 1,9").operator(), Operator::Between);
        assert_eq!(parse("age NOT BETWEEN 1,9").operator(), Operator::NotBetween);
        assert_eq!(parse("age NOT   BETWEEN 1,9").operator(), Operator::NotBetween);
    }

    #[test]
    fn keyword_inside_column_is_not_an_operator() {
        let filter = parse("LINK==x");
        assert_eq!(filter.column(), "LINK");
        assert_eq!(filter.operator(), Operator::Equal);

        let filter = parse("INDEX IN 1,2");
        assert_eq!(filter.column(), "INDEX");
        assert_eq!(filter.operator(), Operator::In);
    }

    #[test]
    fn operator_word_is_not_a_column() {
        for token in ["NOT IN x", "NOT BETWEEN 1,2", "IN IN a,b", "LIKE LIKE x", "BETWEEN==1"] {
            assert_eq!(
                Filter::parse(token),
                Err(QueryError::MalformedFilter {
                    token: token.to_string()
                }),
                "{token}"
            );
        }

        // Only the bare words are reserved
        assert_eq!(parse("NOTE IN a,b").column(), "NOTE");
        assert_eq!(parse("not IN a").column(), "not");
    }

    #[test]
    fn keyword_must_end_at_word_boundary() {
        assert!(matches!(
            Filter::parse("status INactive"),
            Err(QueryError::MalformedFilter { .. })
        ));
    }

    #[test]
    fn lower_case_keyword_is_rejected() {
        assert!(matches!(
            Filter::parse("name like adm"),
            Err(QueryError::MalformedFilter { .. })
        ));
    }

    #[test]
    fn value_may_contain_operator_characters() {
        let filter = parse("expression==a>=b");
        assert_eq!(filter.column(), "expression");
        assert_eq!(filter.value(), "a>=b");
    }

    #[test]
    fn missing_operator_is_malformed() {
        let err = Filter::parse("nameadmin").unwrap_err();
        assert_eq!(
            err,
            QueryError::MalformedFilter {
                token: "nameadmin".to_string()
            }
        );
    }

    #[test]
    fn missing_column_is_malformed() {
        assert!(matches!(
            Filter::parse("==admin"),
            Err(QueryError::MalformedFilter { .. })
        ));
        assert!(matches!(
            Filter::parse("   "),
            Err(QueryError::MalformedFilter { .. })
        ));
    }

    #[test]
    fn empty_value_is_rejected() {
        assert_eq!(
            Filter::parse("name== ").unwrap_err(),
            QueryError::EmptyFilterValue {
                token: "name== ".to_string()
            }
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        for raw in ["age>=18", "name ILIKE adm", "id IN 1,2,3"] {
            assert_eq!(Filter::parse(raw), Filter::parse(raw));
        }
    }

    #[test]
    fn split_list_values() {
        let filter = parse("id IN (1, 2 ,, 3)");
        assert_eq!(filter.split(','), vec!["1", "2", "3"]);

        let filter = parse("age BETWEEN 18,65");
        assert_eq!(filter.split(','), vec!["18", "65"]);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["age>=18", "status NOT IN a,b"] {
            let filter = parse(raw);
            assert_eq!(parse(&filter.to_string()), filter);
        }
    }
}
