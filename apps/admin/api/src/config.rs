use core_config::{FromEnv, pagination::PaginationConfig, server::ServerConfig};
use database::postgres::PostgresConfig;
use query_spec::QueryDefaults;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub pagination: PaginationConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080 unless set
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let pagination = PaginationConfig::from_env()?;

        Ok(Self {
            environment,
            server,
            database,
            pagination,
        })
    }

    /// Paging defaults handed to the `ListQuery` extractor.
    pub fn query_defaults(&self) -> QueryDefaults {
        let defaults = QueryDefaults::new(self.pagination.default_per_page);
        match self.pagination.max_per_page() {
            Some(max) => defaults.with_max_per_page(max),
            None => defaults,
        }
    }
}
