use crate::error::CapabilityError;
use crate::operator::Operator;
use crate::query::Query;

/// What a persistence adapter allows on one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub operators: &'static [Operator],
    pub sortable: bool,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, operators: &'static [Operator], sortable: bool) -> Self {
        Self {
            name,
            operators,
            sortable,
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }
}

/// The columns, relations and search columns an adapter understands.
///
/// Declared as a `const` next to the adapter and checked before any
/// statement is built, so a request for an unknown column fails with a
/// [`CapabilityError`] instead of reaching the data store.
///
/// ```
/// use query_spec::{Capabilities, ColumnSpec, Operator, Query};
///
/// const ROLES: Capabilities = Capabilities::new(
///     &[
///         ColumnSpec::new("id", Operator::MEMBERSHIP, false),
///         ColumnSpec::new("name", Operator::TEXT, true),
///     ],
///     &["permissions"],
///     &["name"],
/// );
///
/// let query = Query::default().with_filter("name", Operator::ILike, "adm");
/// assert!(ROLES.check(&query).is_ok());
///
/// let query = Query::default().with_filter("password", Operator::Equal, "x");
/// assert!(ROLES.check(&query).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    columns: &'static [ColumnSpec],
    relations: &'static [&'static str],
    search_columns: &'static [&'static str],
}

impl Capabilities {
    pub const fn new(
        columns: &'static [ColumnSpec],
        relations: &'static [&'static str],
        search_columns: &'static [&'static str],
    ) -> Self {
        Self {
            columns,
            relations,
            search_columns,
        }
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn search_columns(&self) -> &'static [&'static str] {
        self.search_columns
    }

    pub fn knows_relation(&self, name: &str) -> bool {
        self.relations.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// Rejects filters and sorts the table does not allow.
    pub fn check(&self, query: &Query) -> Result<(), CapabilityError> {
        for filter in query.filters() {
            let column =
                self.column(filter.column())
                    .ok_or_else(|| CapabilityError::UnknownColumn {
                        column: filter.column().to_string(),
                    })?;
            if !column.allows(filter.operator()) {
                return Err(CapabilityError::UnsupportedOperator {
                    column: filter.column().to_string(),
                    operator: filter.operator(),
                });
            }
        }

        for sort in query.sorts() {
            match self.column(sort.column()) {
                Some(column) if column.sortable => {}
                _ => {
                    return Err(CapabilityError::UnsortableColumn {
                        column: sort.column().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Requested relations this adapter knows, in table order.
    ///
    /// Unknown include names are dropped without error.
    pub fn relations(&self, query: &Query) -> Vec<&'static str> {
        for include in query.includes() {
            if !self.knows_relation(include.name()) {
                tracing::debug!(include = %include, "ignoring unknown include");
            }
        }

        self.relations
            .iter()
            .copied()
            .filter(|relation| query.has_include(relation))
            .collect()
    }
}
