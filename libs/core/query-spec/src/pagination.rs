use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::query::Query;

/// Query parameter rewritten by [`page_url`].
pub const PAGE_PARAM: &str = "page";

/// A slice of a result set as returned by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPagination<T> {
    pub offset: u64,
    /// Page size the slice was fetched with; `0` means unbounded.
    pub limit: u64,
    pub items: Vec<T>,
    /// Rows matching the query, ignoring offset and limit.
    pub total_items: u64,
}

impl<T> OffsetPagination<T> {
    pub fn new(offset: u64, limit: u64, items: Vec<T>, total_items: u64) -> Self {
        Self {
            offset,
            limit,
            items,
            total_items,
        }
    }

    /// Empty slice positioned where `query` points.
    pub fn empty(query: &Query, total_items: u64) -> Self {
        Self::new(query.offset(), query.limit(), Vec::new(), total_items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based page the offset falls on. An unbounded limit is a single page.
    pub fn current_page(&self) -> u64 {
        match self.limit {
            0 => 1,
            limit => self.offset / limit + 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> OffsetPagination<U> {
        OffsetPagination {
            offset: self.offset,
            limit: self.limit,
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
        }
    }
}

/// Page-oriented view of a result slice, with navigation links.
///
/// Absent page numbers and links serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagePagination<T> {
    pub current_page: u64,
    pub per_page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub last_page: u64,
    pub first_page_url: String,
    pub prev_page_url: Option<String>,
    pub next_page_url: Option<String>,
    pub last_page_url: String,
    pub items: Vec<T>,
    pub total_items: u64,
}

impl<T> PagePagination<T> {
    /// Derives page navigation for `pagination`, linking relative to `base_url`.
    ///
    /// A current page past the last page is kept as is; it simply has no
    /// next page.
    pub fn from_offset(pagination: OffsetPagination<T>, base_url: &Url) -> Self {
        let current_page = pagination.current_page();
        Self::new(
            pagination.items,
            pagination.total_items,
            current_page,
            pagination.limit,
            base_url,
        )
    }

    pub fn new(
        items: Vec<T>,
        total_items: u64,
        current_page: u64,
        per_page: u64,
        base_url: &Url,
    ) -> Self {
        let current_page = current_page.max(1);
        let last_page = last_page(total_items, per_page);

        let has_prev_page = current_page > 1;
        let has_next_page = current_page < last_page;
        let prev_page = has_prev_page.then(|| current_page - 1);
        let next_page = has_next_page.then(|| current_page + 1);

        let link = |page: u64| page_url(base_url, page).to_string();

        Self {
            current_page,
            per_page,
            has_prev_page,
            has_next_page,
            prev_page,
            next_page,
            last_page,
            first_page_url: link(1),
            prev_page_url: prev_page.map(link),
            next_page_url: next_page.map(link),
            last_page_url: link(last_page),
            items,
            total_items,
        }
    }
}

/// `ceil(total_items / per_page)`, at least 1. A zero page size is one page.
pub fn last_page(total_items: u64, per_page: u64) -> u64 {
    match per_page {
        0 => 1,
        per_page => total_items.div_ceil(per_page).max(1),
    }
}

/// `base` with its `page` parameter set to `page`.
///
/// Any existing `page` values are replaced, other parameters kept, and the
/// query string re-encoded with keys in sorted order (values of a repeated key
/// keep their relative order).
pub fn page_url(base: &Url, page: u64) -> Url {
    let mut pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key.as_ref() != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.push((PAGE_PARAM.to_string(), page.to_string()));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}
