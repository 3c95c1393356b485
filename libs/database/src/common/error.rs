use sea_orm::DbErr;

/// Failures of the connection pool and of the readiness query.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Every connection attempt failed. Holds the last driver error.
    #[error("could not connect to PostgreSQL after {attempts} attempt(s): {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: DbErr,
    },

    /// The pool is open but `SELECT 1` did not come back.
    #[error("PostgreSQL did not answer the readiness query: {0}")]
    NotReady(#[source] DbErr),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
