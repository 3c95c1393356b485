use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Opens a pool with the default [`PostgresConfig`] settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(PostgresConfig::new(database_url).into_connect_options()).await
}

pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(config.into_connect_options()).await
}

/// [`connect_from_config`], retried with backoff. `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    let options = config.into_connect_options();
    let retry_config = retry_config.unwrap_or_default();
    let attempts = retry_config.max_retries + 1;

    retry_with_backoff(|| connect_with_options(options.clone()), retry_config)
        .await
        .map_err(|source| DatabaseError::Unreachable { attempts, source })
}
