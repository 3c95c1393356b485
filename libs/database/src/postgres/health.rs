use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use std::time::Instant;
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Runs `SELECT 1` against `db`.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    let start = Instant::now();
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(DatabaseError::NotReady)?;

    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "PostgreSQL health check passed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_healthy_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("?column?", sea_orm::Value::from(1i32))])]])
            .into_connection();

        assert!(check_health(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_unhealthy_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let err = check_health(&db).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotReady(DbErr::Custom(_))));
        assert!(err.to_string().contains("connection reset"));
    }
}
