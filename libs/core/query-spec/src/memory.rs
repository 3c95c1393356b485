//! Evaluates a [`Query`] against records held in memory.
//!
//! Backs the in-memory repositories used in development and tests. Semantics
//! follow the SQL adapters: a NULL field matches no filter, LIKE is a
//! case-sensitive substring match and ILIKE a case-insensitive one, NULLs
//! sort first in ascending order.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::adapter::{between_bounds, list_values};
use crate::capability::Capabilities;
use crate::error::CapabilityError;
use crate::filter::Filter;
use crate::operator::Operator;
use crate::query::Query;
use crate::sort::Sort;
use crate::value::{parse_bool, parse_timestamp};

/// A column value read from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Integer(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Null,
}

impl<'a> From<&'a str> for Field<'a> {
    fn from(value: &'a str) -> Self {
        Field::Text(value)
    }
}

impl<'a> From<&'a String> for Field<'a> {
    fn from(value: &'a String) -> Self {
        Field::Text(value)
    }
}

impl From<i64> for Field<'_> {
    fn from(value: i64) -> Self {
        Field::Integer(value)
    }
}

impl From<bool> for Field<'_> {
    fn from(value: bool) -> Self {
        Field::Bool(value)
    }
}

impl From<DateTime<Utc>> for Field<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Field::Timestamp(value)
    }
}

impl From<Uuid> for Field<'_> {
    fn from(value: Uuid) -> Self {
        Field::Uuid(value)
    }
}

impl<'a, T: Into<Field<'a>>> From<Option<T>> for Field<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Null, Into::into)
    }
}

/// A record whose columns can be read by name.
pub trait Record {
    /// `None` when the record has no such column.
    fn field(&self, column: &str) -> Option<Field<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, column: &str) -> Option<Field<'_>> {
        (**self).field(column)
    }
}

/// Whether `record` satisfies the search term and every filter of `query`.
pub fn matches<R: Record>(
    record: &R,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<bool, CapabilityError> {
    if let Some(term) = query.search() {
        let term = term.to_lowercase();
        let found = capabilities.search_columns().iter().any(|column| {
            matches!(record.field(column), Some(Field::Text(text)) if text.to_lowercase().contains(&term))
        });
        if !found {
            return Ok(false);
        }
    }

    for filter in query.filters() {
        let field = record
            .field(filter.column())
            .ok_or_else(|| CapabilityError::UnknownColumn {
                column: filter.column().to_string(),
            })?;
        if !filter_matches(field, filter)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Records matching `query`, in input order.
pub fn filter_records<'r, R, I>(
    records: I,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<Vec<&'r R>, CapabilityError>
where
    R: Record + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let mut matched = Vec::new();
    for record in records {
        if matches(record, query, capabilities)? {
            matched.push(record);
        }
    }
    Ok(matched)
}

/// Number of records matching `query`, ignoring paging.
pub fn count<'r, R, I>(
    records: I,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<u64, CapabilityError>
where
    R: Record + 'r,
    I: IntoIterator<Item = &'r R>,
{
    capabilities.check(query)?;
    Ok(filter_records(records, query, capabilities)?.len() as u64)
}

/// The page of matching records `query` selects, sorted.
pub fn select<'r, R, I>(
    records: I,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<Vec<R>, CapabilityError>
where
    R: Record + Clone + 'r,
    I: IntoIterator<Item = &'r R>,
{
    capabilities.check(query)?;
    let mut matched = filter_records(records, query, capabilities)?;
    sort_records(&mut matched, query.sorts());

    Ok(matched
        .into_iter()
        .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(query.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect())
}

/// Stable sort by each sort in turn; later sorts break ties of earlier ones.
pub fn sort_records<R: Record>(records: &mut [R], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        sorts
            .iter()
            .map(|sort| {
                let ordering = compare_fields(a.field(sort.column()), b.field(sort.column()));
                if sort.order().is_descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

fn compare_fields(a: Option<Field<'_>>, b: Option<Field<'_>>) -> Ordering {
    let a = a.unwrap_or(Field::Null);
    let b = b.unwrap_or(Field::Null);
    match (a, b) {
        (Field::Null, Field::Null) => Ordering::Equal,
        (Field::Null, _) => Ordering::Less,
        (_, Field::Null) => Ordering::Greater,
        (Field::Text(a), Field::Text(b)) => a.cmp(b),
        (Field::Integer(a), Field::Integer(b)) => a.cmp(&b),
        (Field::Bool(a), Field::Bool(b)) => a.cmp(&b),
        (Field::Timestamp(a), Field::Timestamp(b)) => a.cmp(&b),
        (Field::Uuid(a), Field::Uuid(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// Orders `field` against the raw operand, converting the operand to the
/// field's type. `None` for a NULL field.
fn compare_raw(field: Field<'_>, raw: &str, filter: &Filter) -> Result<Option<Ordering>, CapabilityError> {
    let invalid = |expected: &str| CapabilityError::invalid_value(filter, format!("expected {expected}"));

    let ordering = match field {
        Field::Null => return Ok(None),
        Field::Text(text) => text.cmp(raw),
        Field::Integer(n) => n.cmp(&raw.parse::<i64>().map_err(|_| invalid("an integer"))?),
        Field::Bool(b) => b.cmp(&parse_bool(raw).ok_or_else(|| invalid("true or false"))?),
        Field::Timestamp(t) => t.cmp(&parse_timestamp(raw).ok_or_else(|| invalid("a date or RFC 3339 timestamp"))?),
        Field::Uuid(id) => id.cmp(&raw.parse::<Uuid>().map_err(|_| invalid("a UUID"))?),
    };
    Ok(Some(ordering))
}

fn filter_matches(field: Field<'_>, filter: &Filter) -> Result<bool, CapabilityError> {
    if matches!(field, Field::Null) {
        return Ok(false);
    }

    let value = filter.value();
    let compare = |raw: &str| compare_raw(field, raw, filter);

    let matched = match filter.operator() {
        Operator::Equal => compare(value)? == Some(Ordering::Equal),
        Operator::NotEqual => matches!(compare(value)?, Some(o) if o.is_ne()),
        Operator::GreaterThan => compare(value)? == Some(Ordering::Greater),
        Operator::GreaterThanOrEqual => matches!(compare(value)?, Some(o) if o.is_ge()),
        Operator::LessThan => compare(value)? == Some(Ordering::Less),
        Operator::LessThanOrEqual => matches!(compare(value)?, Some(o) if o.is_le()),
        Operator::Like | Operator::ILike => {
            let Field::Text(text) = field else {
                return Err(CapabilityError::invalid_value(
                    filter,
                    "pattern matching needs a text column",
                ));
            };
            if filter.operator() == Operator::Like {
                text.contains(value)
            } else {
                text.to_lowercase().contains(&value.to_lowercase())
            }
        }
        Operator::In | Operator::NotIn => {
            let mut found = false;
            for candidate in list_values(filter) {
                found |= compare(candidate)? == Some(Ordering::Equal);
            }
            found == (filter.operator() == Operator::In)
        }
        Operator::Between | Operator::NotBetween => {
            let (low, high) = between_bounds(filter)?;
            let within = matches!(compare(low)?, Some(o) if o.is_ge())
                && matches!(compare(high)?, Some(o) if o.is_le());
            within == (filter.operator() == Operator::Between)
        }
    };

    Ok(matched)
}
