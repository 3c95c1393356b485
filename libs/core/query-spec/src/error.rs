use thiserror::Error;

use crate::operator::Operator;

/// Grammar hint attached to malformed filter errors.
pub const FILTER_GRAMMAR: &str = "<column><operator><value> where operator is one of ==, !=, >=, <=, >, <, LIKE, ILIKE, IN, NOT IN, BETWEEN, NOT BETWEEN";

/// Grammar hint attached to malformed sort errors.
pub const SORT_GRAMMAR: &str = "<column> for ascending or -<column> for descending";

/// Errors raised while turning raw request input into a [`Query`](crate::Query).
///
/// Every variant is a client error. Parsing stops at the first offending token,
/// before any persistence call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("malformed filter '{token}': expected {}", FILTER_GRAMMAR)]
    MalformedFilter { token: String },

    #[error("filter '{token}' has an empty value")]
    EmptyFilterValue { token: String },

    #[error("malformed sort '{token}': expected {}", SORT_GRAMMAR)]
    MalformedSort { token: String },

    #[error("invalid {parameter} '{value}': expected a whole number")]
    InvalidPaging {
        parameter: &'static str,
        value: String,
    },

    #[error("invalid {parameter} '{value}': too large, the page offset must stay below {}", i64::MAX)]
    PagingOutOfRange {
        parameter: &'static str,
        value: String,
    },
}

impl QueryError {
    /// Name of the request parameter the error belongs to.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::MalformedFilter { .. } | Self::EmptyFilterValue { .. } => "filter",
            Self::MalformedSort { .. } => "sort",
            Self::InvalidPaging { parameter, .. } | Self::PagingOutOfRange { parameter, .. } => {
                *parameter
            }
        }
    }

    /// The raw token or value that was rejected.
    pub fn token(&self) -> &str {
        match self {
            Self::MalformedFilter { token }
            | Self::EmptyFilterValue { token }
            | Self::MalformedSort { token } => token,
            Self::InvalidPaging { value, .. } | Self::PagingOutOfRange { value, .. } => value,
        }
    }
}

/// Errors raised by a persistence adapter when a well-formed query asks for
/// something its capability table does not offer.
///
/// Kept apart from [`QueryError`]: a column that does not exist is a schema
/// concern of the adapter, not a grammar problem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("unknown filter column '{column}'")]
    UnknownColumn { column: String },

    #[error("operator {operator} is not supported on column '{column}'")]
    UnsupportedOperator { column: String, operator: Operator },

    #[error("column '{column}' cannot be sorted")]
    UnsortableColumn { column: String },

    #[error("invalid value '{value}' for {column} {operator}: {reason}")]
    InvalidValue {
        column: String,
        operator: Operator,
        value: String,
        reason: String,
    },
}

impl CapabilityError {
    /// Name of the request parameter the error belongs to.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::UnsortableColumn { .. } => "sort",
            _ => "filter",
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::UnknownColumn { column }
            | Self::UnsupportedOperator { column, .. }
            | Self::UnsortableColumn { column }
            | Self::InvalidValue { column, .. } => column,
        }
    }

    pub(crate) fn invalid_value(
        filter: &crate::Filter,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            column: filter.column().to_string(),
            operator: filter.operator(),
            value: filter.value().to_string(),
            reason: reason.into(),
        }
    }
}
