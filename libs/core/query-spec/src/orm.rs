//! Applies a [`Query`] to a sea-orm [`Select`].
//!
//! Query columns are resolved through the entity's `Column: FromStr`
//! (snake_case column names), after the adapter's [`Capabilities`] table has
//! accepted them. Filter values are converted according to the column type so
//! that `id==<uuid>` binds a UUID and `created_at>2024-01-01` binds a
//! timestamp. `ILIKE` is Postgres syntax.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, EntityTrait, IdenStatic, QueryFilter, QueryOrder,
    QuerySelect, Select, Value,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::adapter::{between_bounds, like_pattern, list_values};
use crate::capability::Capabilities;
use crate::error::CapabilityError;
use crate::filter::Filter;
use crate::operator::Operator;
use crate::query::Query;
use crate::sort::SortOrder;
use crate::value::{parse_bool, parse_timestamp};

/// Column of `E` named `name`.
pub fn resolve_column<E: EntityTrait>(name: &str) -> Option<E::Column> {
    E::Column::from_str(name).ok()
}

/// Checks `query` against `capabilities` and applies its filters and search.
///
/// The result selects every matching row; use it for counting.
pub fn filtered<E: EntityTrait>(
    select: Select<E>,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<Select<E>, CapabilityError> {
    capabilities.check(query)?;
    let select = apply_filters(select, query)?;
    Ok(apply_search(select, query, capabilities))
}

/// [`filtered`] plus sorts and paging: the rows of one page.
pub fn paged<E: EntityTrait>(
    select: Select<E>,
    query: &Query,
    capabilities: &Capabilities,
) -> Result<Select<E>, CapabilityError> {
    let select = filtered(select, query, capabilities)?;
    let select = apply_sorts(select, query)?;
    Ok(apply_paging(select, query))
}

/// ANDs every filter of `query` onto `select`.
pub fn apply_filters<E: EntityTrait>(
    mut select: Select<E>,
    query: &Query,
) -> Result<Select<E>, CapabilityError> {
    for filter in query.filters() {
        let column =
            resolve_column::<E>(filter.column()).ok_or_else(|| CapabilityError::UnknownColumn {
                column: filter.column().to_string(),
            })?;
        select = select.filter(filter_expr::<E>(column, filter)?);
    }
    Ok(select)
}

/// Matches the search term against the search columns with `ILIKE`, OR-ed.
pub fn apply_search<E: EntityTrait>(
    select: Select<E>,
    query: &Query,
    capabilities: &Capabilities,
) -> Select<E> {
    let Some(term) = query.search() else {
        return select;
    };

    let pattern = like_pattern(term);
    let condition = capabilities
        .search_columns()
        .iter()
        .filter_map(|name| {
            let column = resolve_column::<E>(name);
            if column.is_none() {
                tracing::warn!(column = %name, "search column is not a column of the entity");
            }
            column
        })
        .fold(Condition::any(), |condition, column| {
            condition.add(ilike::<E>(column, &pattern))
        });

    if condition.is_empty() {
        select
    } else {
        select.filter(condition)
    }
}

/// Orders by each sort in list order.
pub fn apply_sorts<E: EntityTrait>(
    mut select: Select<E>,
    query: &Query,
) -> Result<Select<E>, CapabilityError> {
    for sort in query.sorts() {
        let column =
            resolve_column::<E>(sort.column()).ok_or_else(|| CapabilityError::UnsortableColumn {
                column: sort.column().to_string(),
            })?;
        select = match sort.order() {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
    }
    Ok(select)
}

pub fn apply_paging<E: EntityTrait>(select: Select<E>, query: &Query) -> Select<E> {
    select.offset(query.offset()).limit(query.limit())
}

/// The SQL expression for one filter on `column`.
pub fn filter_expr<E: EntityTrait>(
    column: E::Column,
    filter: &Filter,
) -> Result<SimpleExpr, CapabilityError> {
    let column_type = column.def().get_column_type().clone();
    let value = |raw: &str| {
        typed_value(&column_type, raw).map_err(|reason| CapabilityError::invalid_value(filter, reason))
    };
    let values = || {
        list_values(filter)
            .into_iter()
            .map(value)
            .collect::<Result<Vec<_>, _>>()
    };

    let expr = match filter.operator() {
        Operator::Equal => column.eq(value(filter.value())?),
        Operator::NotEqual => column.ne(value(filter.value())?),
        Operator::GreaterThan => column.gt(value(filter.value())?),
        Operator::GreaterThanOrEqual => column.gte(value(filter.value())?),
        Operator::LessThan => column.lt(value(filter.value())?),
        Operator::LessThanOrEqual => column.lte(value(filter.value())?),
        Operator::Like => column.like(like_pattern(filter.value())),
        Operator::ILike => ilike::<E>(column, &like_pattern(filter.value())),
        Operator::In => column.is_in(values()?),
        Operator::NotIn => column.is_not_in(values()?),
        Operator::Between => {
            let (low, high) = between_bounds(filter)?;
            column.between(value(low)?, value(high)?)
        }
        Operator::NotBetween => {
            let (low, high) = between_bounds(filter)?;
            column.not_between(value(low)?, value(high)?)
        }
    };

    Ok(expr)
}

fn ilike<E: EntityTrait>(column: E::Column, pattern: &str) -> SimpleExpr {
    let sql = format!(
        "\"{}\".\"{}\" ILIKE $1",
        E::default().table_name(),
        IdenStatic::as_str(&column)
    );
    Expr::cust_with_values(sql, [pattern.to_string()])
}

fn typed_value(column_type: &ColumnType, raw: &str) -> Result<Value, String> {
    match column_type {
        ColumnType::Uuid => raw
            .parse::<Uuid>()
            .map(Value::from)
            .map_err(|_| "expected a UUID".to_string()),
        ColumnType::Boolean => parse_bool(raw)
            .map(Value::from)
            .ok_or_else(|| "expected true or false".to_string()),
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| "expected an integer".to_string()),
        ColumnType::Timestamp | ColumnType::TimestampWithTimeZone | ColumnType::DateTime => {
            parse_timestamp(raw)
                .map(Value::from)
                .ok_or_else(|| "expected a date or RFC 3339 timestamp".to_string())
        }
        ColumnType::Date => parse_timestamp(raw)
            .map(|t| Value::from(t.date_naive()))
            .ok_or_else(|| "expected a date".to_string()),
        _ => Ok(Value::from(raw.to_string())),
    }
}
