use crate::{env_parse, ConfigError, FromEnv};

/// Page size settings for list endpoints.
///
/// `max_per_page` of 0 disables the upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl PaginationConfig {
    /// The upper bound, if any.
    pub fn max_per_page(&self) -> Option<u64> {
        (self.max_per_page > 0).then_some(self.max_per_page)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

impl FromEnv for PaginationConfig {
    /// `DEFAULT_PER_PAGE` (default 10) and `MAX_PER_PAGE` (default 100).
    fn from_env() -> Result<Self, ConfigError> {
        let default_per_page: u64 = env_parse("DEFAULT_PER_PAGE", "10")?;
        let max_per_page: u64 = env_parse("MAX_PER_PAGE", "100")?;

        if default_per_page == 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PER_PAGE".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        if max_per_page > 0 && max_per_page < default_per_page {
            return Err(ConfigError::Invalid {
                key: "MAX_PER_PAGE".to_string(),
                details: format!("must not be below DEFAULT_PER_PAGE ({default_per_page})"),
            });
        }

        Ok(Self {
            default_per_page,
            max_per_page,
        })
    }
}
