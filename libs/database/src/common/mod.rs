//! Error type and retry helpers shared by the connectors.

#[cfg(feature = "postgres")]
pub mod error;
pub mod retry;

#[cfg(feature = "postgres")]
pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff};
