//! The contract a repository implements to serve [`Query`] requests.
//!
//! An adapter owns three decisions the query language leaves open:
//!
//! - **Value interpretation.** List operators (`IN`, `NOT IN`, `BETWEEN`,
//!   `NOT BETWEEN`) split their value on [`VALUE_DELIMITER`]; `BETWEEN` needs
//!   exactly two parts (see [`between_bounds`]). `LIKE` and `ILIKE` match the
//!   value anywhere in the column (see [`like_pattern`]).
//! - **Schema.** Which columns, operators, sorts and relations exist, declared
//!   in a [`Capabilities`](crate::Capabilities) table and checked before the
//!   data store is touched.
//! - **Search.** Which columns the free-text `search` term is matched against.
//!
//! Sorts are applied in list order, the first being the primary key.
//! Unknown include names are ignored. Storage errors are returned unchanged
//! and never retried.

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::filter::Filter;
use crate::pagination::OffsetPagination;
use crate::query::Query;

/// Separator for list-valued filters: `filter=id IN 1,2,3`.
pub const VALUE_DELIMITER: char = ',';

#[async_trait]
pub trait QueryAdapter: Send + Sync {
    type Item: Send;
    type Error: Send;

    /// Rows matching the query's filters and search, ignoring paging.
    async fn count(&self, query: &Query) -> Result<u64, Self::Error>;

    /// Rows matching filters and search, sorted, with the requested relations
    /// loaded, limited to `query.offset()` / `query.limit()`.
    async fn fetch(&self, query: &Query) -> Result<Vec<Self::Item>, Self::Error>;

    /// Count then fetch, packaged as one page of results.
    async fn paginate(&self, query: &Query) -> Result<OffsetPagination<Self::Item>, Self::Error> {
        let total_items = self.count(query).await?;
        if total_items <= query.offset() {
            return Ok(OffsetPagination::empty(query, total_items));
        }

        let items = self.fetch(query).await?;
        Ok(OffsetPagination::new(
            query.offset(),
            query.limit(),
            items,
            total_items,
        ))
    }

    /// First row of the page `query` selects, if any.
    async fn first(&self, query: &Query) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.fetch(query).await?.into_iter().next())
    }
}

/// Parts of a list-valued filter, split on [`VALUE_DELIMITER`].
pub fn list_values(filter: &Filter) -> Vec<&str> {
    filter.split(VALUE_DELIMITER)
}

/// Lower and upper bound of a `BETWEEN` / `NOT BETWEEN` filter.
pub fn between_bounds(filter: &Filter) -> Result<(&str, &str), CapabilityError> {
    match list_values(filter).as_slice() {
        [low, high] => Ok((*low, *high)),
        _ => Err(CapabilityError::invalid_value(
            filter,
            format!("expected two values separated by '{VALUE_DELIMITER}'"),
        )),
    }
}

/// `%value%`, for `LIKE` and `ILIKE`.
pub fn like_pattern(value: &str) -> String {
    format!("%{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Numbers {
        total: u64,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl QueryAdapter for Numbers {
        type Item = u64;
        type Error = String;

        async fn count(&self, _query: &Query) -> Result<u64, String> {
            Ok(self.total)
        }

        async fn fetch(&self, query: &Query) -> Result<Vec<u64>, String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok((query.offset()..self.total)
                .take(query.limit() as usize)
                .collect())
        }
    }

    fn numbers(total: u64) -> Numbers {
        Numbers {
            total,
            fetches: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn paginate_counts_then_fetches() {
        let adapter = numbers(25);
        let query = Query::default().with_page(3, 10);

        let page = adapter.paginate(&query).await.unwrap();

        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 10);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
    }

    #[tokio::test]
    async fn paginate_skips_fetch_past_the_end() {
        let adapter = numbers(5);
        let query = Query::default().with_page(2, 10);

        let page = adapter.paginate(&query).await.unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_items, 5);
        assert_eq!(adapter.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn errors_are_propagated_unchanged() {
        struct Broken;

        #[async_trait]
        impl QueryAdapter for Broken {
            type Item = ();
            type Error = String;

            async fn count(&self, _query: &Query) -> Result<u64, String> {
                Err("connection reset".to_string())
            }

            async fn fetch(&self, _query: &Query) -> Result<Vec<()>, String> {
                Ok(Vec::new())
            }
        }

        let err = Broken.paginate(&Query::default()).await.unwrap_err();
        assert_eq!(err, "connection reset");
    }

    #[tokio::test]
    async fn first_returns_leading_row() {
        let adapter = numbers(3);
        assert_eq!(adapter.first(&Query::default()).await.unwrap(), Some(0));
        assert_eq!(numbers(0).first(&Query::default()).await.unwrap(), None);
    }

    #[test]
    fn between_requires_two_bounds() {
        let filter = Filter::new("age", Operator::Between, "18, 65");
        assert_eq!(between_bounds(&filter).unwrap(), ("18", "65"));

        let filter = Filter::new("age", Operator::Between, "18");
        assert!(matches!(
            between_bounds(&filter),
            Err(CapabilityError::InvalidValue { .. })
        ));
    }

    #[test]
    fn like_wraps_in_wildcards() {
        assert_eq!(like_pattern("adm"), "%adm%");
    }
}
