use serde::Serialize;
use std::num::IntErrorKind;
use utoipa::IntoParams;

use crate::error::QueryError;
use crate::filter::Filter;
use crate::include::Include;
use crate::operator::Operator;
use crate::sort::Sort;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Largest offset a parsed query may reach. Postgres `OFFSET` is a signed
/// 64-bit integer.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Column used by [`Query::filter_by_id`].
pub const ID_COLUMN: &str = "id";

/// Paging values applied when the request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub page: u64,
    pub per_page: u64,
    /// Upper bound for `per_page`; larger requests are clamped. `None` means no bound.
    pub max_per_page: Option<u64>,
}

impl QueryDefaults {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            ..Self::default()
        }
    }

    pub fn with_max_per_page(mut self, max_per_page: u64) -> Self {
        self.max_per_page = Some(max_per_page.max(1));
        self
    }

    fn clamp_per_page(&self, per_page: u64) -> u64 {
        match self.max_per_page {
            Some(max) => per_page.min(max),
            None => per_page,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            max_per_page: None,
        }
    }
}

/// Unparsed list-request parameters, as found in a query string.
///
/// `filter`, `sort` and `include` may repeat; for the other keys the first
/// occurrence is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawQuery {
    /// Page number, starting at 1
    #[param(example = "1")]
    pub page: Option<String>,
    /// Items per page
    #[param(example = "10")]
    pub per_page: Option<String>,
    /// Free-text search term
    pub search: Option<String>,
    /// `<column><operator><value>`, e.g. `name==admin` or `created_at>=2024-01-01`
    pub filter: Vec<String>,
    /// `<column>` for ascending or `-<column>` for descending
    pub sort: Vec<String>,
    /// Relation to eager-load, e.g. `roles.permissions`
    pub include: Vec<String>,
}

impl RawQuery {
    /// Collects the known keys from a string-keyed multi-value sequence.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "page" => set_once(&mut raw.page, value),
                "per_page" => set_once(&mut raw.per_page, value),
                "search" => set_once(&mut raw.search, value),
                "filter" => raw.filter.push(value.into()),
                "sort" => raw.sort.push(value.into()),
                "include" => raw.include.push(value.into()),
                _ => {}
            }
        }
        raw
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes()).map(|(k, v)| (k, v.into_owned())),
        )
    }

    /// Validates every token and applies `defaults`.
    ///
    /// Fails on the first malformed token; nothing is partially accepted.
    pub fn parse(&self, defaults: &QueryDefaults) -> Result<Query, QueryError> {
        let page = parse_paging("page", self.page.as_deref(), defaults.page)?;
        let per_page = defaults.clamp_per_page(parse_paging(
            "per_page",
            self.per_page.as_deref(),
            defaults.per_page,
        )?);

        let within_range = page
            .saturating_sub(1)
            .checked_mul(per_page)
            .is_some_and(|offset| offset <= MAX_OFFSET);
        if !within_range {
            return Err(QueryError::PagingOutOfRange {
                parameter: "page",
                value: page.to_string(),
            });
        }

        let filters = self
            .filter
            .iter()
            .map(|raw| Filter::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let sorts = self
            .sort
            .iter()
            .map(|raw| Sort::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let includes = self
            .include
            .iter()
            .flat_map(|raw| Include::parse(raw))
            .collect::<Vec<_>>();

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let query = Query {
            page,
            per_page,
            search,
            filters,
            sorts,
            includes,
        };

        tracing::trace!(
            page = query.page,
            per_page = query.per_page,
            filters = query.filters.len(),
            sorts = query.sorts.len(),
            includes = query.includes.len(),
            "parsed list query"
        );

        Ok(query)
    }
}

fn set_once(slot: &mut Option<String>, value: impl Into<String>) {
    if slot.is_none() {
        *slot = Some(value.into());
    }
}

/// Unset, blank and non-positive values take the default. Anything that is
/// not a whole number is rejected, and so is a number too large for a `u64`.
fn parse_paging(parameter: &'static str, raw: Option<&str>, default: u64) -> Result<u64, QueryError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(default);
    };

    match raw.parse::<u64>() {
        Ok(0) => Ok(default),
        Ok(value) => Ok(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
            Err(QueryError::PagingOutOfRange {
                parameter,
                value: raw.to_string(),
            })
        }
        Err(_) if is_negative_whole_number(raw) => Ok(default),
        Err(_) => Err(QueryError::InvalidPaging {
            parameter,
            value: raw.to_string(),
        }),
    }
}

fn is_negative_whole_number(raw: &str) -> bool {
    raw.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// A parsed list request: paging, search, filters, sorts and includes.
///
/// Built once per request and read by the persistence adapter. Lookups by
/// column return the first match, so a repeated `filter=name==a&filter=name==b`
/// reads back as `name==a` through [`Query::filter`]; adapters that walk
/// [`Query::filters`] still see both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    page: u64,
    per_page: u64,
    search: Option<String>,
    filters: Vec<Filter>,
    sorts: Vec<Sort>,
    includes: Vec<Include>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            search: None,
            filters: Vec::new(),
            sorts: Vec::new(),
            includes: Vec::new(),
        }
    }
}

impl Query {
    /// Parses raw request values with the standard defaults (page 1, 10 per page).
    pub fn new<S: AsRef<str>>(
        page: Option<&str>,
        per_page: Option<&str>,
        search: Option<&str>,
        filters: &[S],
        sorts: &[S],
        includes: &[S],
    ) -> Result<Self, QueryError> {
        let owned = |values: &[S]| values.iter().map(|v| v.as_ref().to_string()).collect();
        RawQuery {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            search: search.map(str::to_string),
            filter: owned(filters),
            sort: owned(sorts),
            include: owned(includes),
        }
        .parse(&QueryDefaults::default())
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// `(page - 1) * per_page`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    /// First filter on `column` (case-sensitive) with `operator`.
    pub fn filter(&self, column: &str, operator: Operator) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|f| f.column() == column && f.operator() == operator)
    }

    /// First sort on `column`.
    pub fn sort(&self, column: &str) -> Option<&Sort> {
        self.sorts.iter().find(|s| s.column() == column)
    }

    /// Whether the relation was requested. Case-insensitive, exact name.
    pub fn has_include(&self, name: &str) -> bool {
        self.includes.iter().any(|i| i.matches(name))
    }

    /// The `id ==` filter, if any.
    pub fn id_filter(&self) -> Option<&Filter> {
        self.filter(ID_COLUMN, Operator::Equal)
    }

    pub fn append_filter(
        &mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> &mut Self {
        self.filters.push(Filter::new(column, operator, value));
        self
    }

    /// Restricts the query to one id, ahead of any id filter the caller sent.
    pub fn filter_by_id(&mut self, id: impl ToString) -> &mut Self {
        self.filters
            .insert(0, Filter::new(ID_COLUMN, Operator::Equal, id.to_string()));
        self
    }

    pub fn with_filter(
        mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Self {
        self.append_filter(column, operator, value);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn with_include(mut self, name: impl Into<String>) -> Self {
        self.includes.push(Include::new(name));
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    /// Sets paging directly; zero values are raised to 1.
    pub fn with_page(mut self, page: u64, per_page: u64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortOrder;

    const NONE: &[&str] = &[];

    #[test]
    fn defaults_apply_when_unset() {
        let query = Query::new(None, None, None, NONE, NONE, NONE).unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 10);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 10);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn non_positive_paging_takes_defaults() {
        let query = Query::new(Some("0"), Some("-5"), None, NONE, NONE, NONE).unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 10);
    }

    #[test]
    fn blank_paging_takes_defaults() {
        let query = Query::new(Some(""), Some("  "), None, NONE, NONE, NONE).unwrap();
        assert_eq!((query.page(), query.per_page()), (1, 10));
    }

    #[test]
    fn non_numeric_paging_is_rejected() {
        let err = Query::new(Some("two"), None, None, NONE, NONE, NONE).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidPaging {
                parameter: "page",
                value: "two".to_string()
            }
        );

        let err = Query::new(None, Some("1.5"), None, NONE, NONE, NONE).unwrap_err();
        assert_eq!(err.parameter(), "per_page");
    }

    #[test]
    fn oversized_paging_is_out_of_range() {
        let err = Query::new(Some("99999999999999999999"), None, None, NONE, NONE, NONE).unwrap_err();
        assert_eq!(
            err,
            QueryError::PagingOutOfRange {
                parameter: "page",
                value: "99999999999999999999".to_string()
            }
        );

        // Any negative whole number, however long, is still non-positive
        let query = Query::new(Some("-99999999999999999999"), None, None, NONE, NONE, NONE).unwrap();
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn page_whose_offset_overflows_is_rejected() {
        let page = (u64::MAX / 10).to_string();
        let err = Query::new(Some(page.as_str()), Some("10"), None, NONE, NONE, NONE).unwrap_err();
        assert!(matches!(err, QueryError::PagingOutOfRange { parameter: "page", .. }));

        // The last page whose offset still fits
        let page = (MAX_OFFSET / 10 + 1).to_string();
        let query = Query::new(Some(page.as_str()), Some("10"), None, NONE, NONE, NONE).unwrap();
        assert!(query.offset() <= MAX_OFFSET);
    }

    #[test]
    fn offset_and_limit() {
        let query = Query::new(Some("3"), Some("20"), None, NONE, NONE, NONE).unwrap();
        assert_eq!(query.offset(), 40);
        assert_eq!(query.limit(), 20);
    }

    #[test]
    fn per_page_is_clamped_to_configured_maximum() {
        let raw = RawQuery {
            per_page: Some("500".to_string()),
            ..Default::default()
        };
        let query = raw.parse(&QueryDefaults::new(25).with_max_per_page(100)).unwrap();
        assert_eq!(query.per_page(), 100);

        let query = RawQuery::default()
            .parse(&QueryDefaults::new(25).with_max_per_page(100))
            .unwrap();
        assert_eq!(query.per_page(), 25);
    }

    #[test]
    fn search_is_trimmed_and_blank_is_none() {
        let query = Query::new(None, None, Some("  admin "), NONE, NONE, NONE).unwrap();
        assert_eq!(query.search(), Some("admin"));

        let query = Query::new(None, None, Some("   "), NONE, NONE, NONE).unwrap();
        assert_eq!(query.search(), None);
    }

    #[test]
    fn first_matching_filter_wins() {
        let query = Query::new(
            None,
            None,
            None,
            &["name==first", "name!=other", "name==second"],
            NONE,
            NONE,
        )
        .unwrap();

        assert_eq!(query.filter("name", Operator::Equal).unwrap().value(), "first");
        assert_eq!(query.filter("name", Operator::NotEqual).unwrap().value(), "other");
        assert!(query.filter("name", Operator::Like).is_none());
        assert!(query.filter("Name", Operator::Equal).is_none());
        assert_eq!(query.filters().len(), 3);
    }

    #[test]
    fn first_matching_sort_wins() {
        let query = Query::new(None, None, None, NONE, &["-name", "created_at", "name"], NONE).unwrap();
        assert_eq!(query.sort("name").unwrap().order(), SortOrder::Desc);
        assert_eq!(query.sort("created_at").unwrap().order(), SortOrder::Asc);
        assert!(query.sort("email").is_none());
    }

    #[test]
    fn include_lookup() {
        let query = Query::new(None, None, None, NONE, NONE, &["roles", "Roles.Permissions"]).unwrap();
        assert!(query.has_include("Roles"));
        assert!(query.has_include("roles.permissions"));
        assert!(!query.has_include("role"));
        assert!(!query.has_include("permissions"));
    }

    #[test]
    fn malformed_filter_fails_construction() {
        let err = Query::new(None, None, None, &["name==ok", "nameadmin"], NONE, NONE).unwrap_err();
        assert_eq!(err.token(), "nameadmin");
    }

    #[test]
    fn malformed_sort_fails_construction() {
        let err = Query::new(None, None, None, NONE, &["-"], NONE).unwrap_err();
        assert!(matches!(err, QueryError::MalformedSort { .. }));
    }

    #[test]
    fn filter_by_id_takes_precedence() {
        let mut query = Query::new(None, None, None, &["id==client-sent"], NONE, NONE).unwrap();
        query.filter_by_id("forced");
        assert_eq!(query.id_filter().unwrap().value(), "forced");
        assert_eq!(query.filters().len(), 2);
    }

    #[test]
    fn append_filter_adds_to_the_end() {
        let mut query = Query::default();
        query
            .append_filter("name", Operator::Equal, "admin")
            .append_filter("name", Operator::Equal, "ignored");
        assert_eq!(query.filter("name", Operator::Equal).unwrap().value(), "admin");
        assert_eq!(query.filters().len(), 2);
    }

    #[test]
    fn raw_query_from_pairs() {
        let raw = RawQuery::from_pairs([
            ("page", "2"),
            ("page", "9"),
            ("filter", "name==a"),
            ("filter", "age>1"),
            ("sort", "-name"),
            ("include", "roles"),
            ("unknown", "x"),
        ]);
        assert_eq!(raw.page.as_deref(), Some("2"));
        assert_eq!(raw.filter, vec!["name==a", "age>1"]);
        assert_eq!(raw.sort, vec!["-name"]);
        assert_eq!(raw.include, vec!["roles"]);
    }

    #[test]
    fn raw_query_from_query_string_decodes_values() {
        let raw = RawQuery::from_query_string("filter=name%20%3D%3D%20super%20admin&search=a+b&per_page=5");
        let query = raw.parse(&QueryDefaults::default()).unwrap();
        let filter = query.filter("name", Operator::Equal).unwrap();
        assert_eq!(filter.value(), "super admin");
        assert_eq!(query.search(), Some("a b"));
        assert_eq!(query.per_page(), 5);
    }

    #[test]
    fn builders() {
        let query = Query::default()
            .with_page(0, 0)
            .with_search("  ")
            .with_sort(Sort::desc("created_at"))
            .with_include("permissions");
        assert_eq!((query.page(), query.per_page()), (1, 1));
        assert_eq!(query.search(), None);
        assert!(query.has_include("PERMISSIONS"));
        assert_eq!(query.sorts().len(), 1);
    }
}
