use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Comparison operator of a filter token.
///
/// Keyword operators are matched upper case only, so `name like x` is not a
/// filter on `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "ILIKE")]
    ILike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "BETWEEN")]
    Between,
    #[serde(rename = "NOT BETWEEN")]
    NotBetween,
}

impl Operator {
    /// Every operator, in the order the filter grammar tries them.
    ///
    /// Longer tokens come first so that `>=` is never read as `>` followed by
    /// a value starting with `=`, and `NOT IN` is never read as `IN`.
    pub const ALL: [Operator; 12] = [
        Operator::NotBetween,
        Operator::NotIn,
        Operator::Between,
        Operator::ILike,
        Operator::Like,
        Operator::In,
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    /// `==` and `!=`.
    pub const EQUALITY: &'static [Operator] = &[Operator::Equal, Operator::NotEqual];

    /// Equality plus list membership, for identifiers and flags.
    pub const MEMBERSHIP: &'static [Operator] = &[
        Operator::Equal,
        Operator::NotEqual,
        Operator::In,
        Operator::NotIn,
    ];

    /// Operators that make sense on ordered values such as numbers and
    /// timestamps: comparisons, ranges and list membership.
    pub const ORDERED: &'static [Operator] = &[
        Operator::Equal,
        Operator::NotEqual,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Between,
        Operator::NotBetween,
    ];

    /// Operators that make sense on free text.
    pub const TEXT: &'static [Operator] = &[
        Operator::Equal,
        Operator::NotEqual,
        Operator::Like,
        Operator::ILike,
        Operator::In,
        Operator::NotIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }

    /// Whether the value of a filter with this operator is a delimited list.
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            Self::In | Self::NotIn | Self::Between | Self::NotBetween
        )
    }

    /// Whether the value is a pattern rather than a literal.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the operator tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_parses_from_its_token() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>(), Ok(op));
        }
    }

    #[test]
    fn keyword_operators_are_case_sensitive() {
        assert!("like".parse::<Operator>().is_err());
        assert!("Not In".parse::<Operator>().is_err());
    }

    #[test]
    fn longer_tokens_precede_their_prefixes() {
        let position = |op: Operator| Operator::ALL.iter().position(|o| *o == op).unwrap();
        assert!(position(Operator::GreaterThanOrEqual) < position(Operator::GreaterThan));
        assert!(position(Operator::LessThanOrEqual) < position(Operator::LessThan));
        assert!(position(Operator::NotIn) < position(Operator::In));
        assert!(position(Operator::NotBetween) < position(Operator::Between));
        assert!(position(Operator::ILike) < position(Operator::Like));
    }

    #[test]
    fn serializes_as_token() {
        assert_eq!(serde_json::to_string(&Operator::NotIn).unwrap(), "\"NOT IN\"");
        assert_eq!(serde_json::to_string(&Operator::GreaterThanOrEqual).unwrap(), "\">=\"");
    }

    #[test]
    fn list_operators() {
        assert!(Operator::In.takes_list());
        assert!(Operator::NotBetween.takes_list());
        assert!(!Operator::Equal.takes_list());
        assert!(Operator::ILike.is_pattern());
    }

    #[test]
    fn ordered_columns_accept_every_list_operator() {
        for op in [Operator::In, Operator::NotIn, Operator::Between, Operator::NotBetween] {
            assert!(Operator::ORDERED.contains(&op), "{op:?}");
        }
        assert!(!Operator::ORDERED.contains(&Operator::Like));
    }
}
