use serde::{Deserialize, Serialize};
use std::fmt;

/// A relation the caller wants eager-loaded, e.g. `roles` or `roles.permissions`.
///
/// Whether the name is a real relation is decided by the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Include(String);

impl Include {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Splits one raw `include` token into its relation names.
    ///
    /// A token may list several relations separated by commas. Names are
    /// trimmed and blank names dropped.
    pub fn parse(raw: &str) -> impl Iterator<Item = Include> + '_ {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Include::new)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Case-insensitive exact match: `roles` matches `Roles` but neither
    /// `roles.permissions` nor `myroles`.
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
