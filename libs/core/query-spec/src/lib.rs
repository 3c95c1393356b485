//! Query specification language and pagination for list endpoints.
//!
//! A list request carries flat string tokens:
//!
//! | Parameter  | Example                         |
//! |------------|---------------------------------|
//! | `page`     | `page=2`                        |
//! | `per_page` | `per_page=20`                   |
//! | `search`   | `search=admin`                  |
//! | `filter`   | `filter=created_at>=2024-01-01` |
//! | `sort`     | `sort=-created_at`              |
//! | `include`  | `include=roles.permissions`     |
//!
//! [`RawQuery`] collects them, [`RawQuery::parse`] validates them into a
//! [`Query`], a [`QueryAdapter`] turns the query into an
//! [`OffsetPagination`], and [`PagePagination::from_offset`] derives page
//! numbers and navigation links for the response.
//!
//! ```
//! use query_spec::{OffsetPagination, Operator, PagePagination, QueryDefaults, RawQuery, Url};
//!
//! let raw = RawQuery::from_query_string("filter=name%3D%3Dadmin&sort=-created_at&page=2");
//! let query = raw.parse(&QueryDefaults::default()).unwrap();
//! assert_eq!(query.filter("name", Operator::Equal).unwrap().value(), "admin");
//! assert_eq!(query.offset(), 10);
//!
//! let url = Url::parse("https://api.example.com/roles?page=2").unwrap();
//! let page = PagePagination::from_offset(
//!     OffsetPagination::new(query.offset(), query.limit(), vec!["admin"], 11),
//!     &url,
//! );
//! assert_eq!(page.last_page, 2);
//! assert_eq!(page.prev_page_url.as_deref(), Some("https://api.example.com/roles?page=1"));
//! ```
//!
//! # Features
//!
//! - `sea-orm` - applies queries to `sea_orm::Select` (see [`orm`])

pub mod adapter;
pub mod capability;
pub mod error;
pub mod filter;
pub mod include;
pub mod memory;
pub mod operator;
#[cfg(feature = "sea-orm")]
pub mod orm;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod value;

pub use adapter::{QueryAdapter, VALUE_DELIMITER, between_bounds, like_pattern, list_values};
pub use capability::{Capabilities, ColumnSpec};
pub use error::{CapabilityError, QueryError};
pub use filter::Filter;
pub use include::Include;
pub use operator::Operator;
pub use pagination::{OffsetPagination, PagePagination, last_page, page_url};
pub use query::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, ID_COLUMN, MAX_OFFSET, Query, QueryDefaults, RawQuery,
};
pub use sort::{Sort, SortOrder};

// Re-exported so dependents can name the URL type without their own dependency
pub use url::Url;
