//! Request extractors shared by the domain routers.

pub mod list_query;
pub mod request_url;
pub mod uuid_path;

pub use list_query::ListQuery;
pub use request_url::RequestUrl;
pub use uuid_path::UuidPath;
