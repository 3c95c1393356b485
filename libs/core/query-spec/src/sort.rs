use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use utoipa::ToSchema;

use crate::error::QueryError;

static SORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(-?)(\S+)\s*$").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column to order by. Several sorts on one query are applied in list order,
/// the first being the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    column: String,
    order: SortOrder,
}

impl Sort {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    /// Parses `name` (ascending) or `-name` (descending).
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let malformed = || QueryError::MalformedSort {
            token: raw.to_string(),
        };

        let captures = SORT_PATTERN.captures(raw).ok_or_else(malformed)?;
        let column = &captures[2];
        // `--name` would otherwise become a sort on the column `-name`
        if column.starts_with('-') {
            return Err(malformed());
        }

        let order = if captures[1].is_empty() {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };

        Ok(Self::new(column, order))
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Asc => f.write_str(&self.column),
            SortOrder::Desc => write!(f, "-{}", self.column),
        }
    }
}
