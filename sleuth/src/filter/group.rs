//! Boolean groups of filter primitives.

use serde_json::{json, Value};

use super::operator::Clause;
use super::primitive::FilterPrimitive;
use super::required_str;
use crate::{Error, Result};

/// A non-empty, ordered set of primitives joined by one clause.
///
/// Every field factory returns one of these, even for a single predicate, so
/// a query only ever deals with groups.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    clause: Clause,
    filters: Vec<FilterPrimitive>,
}

impl FilterGroup {
    pub fn new(filters: Vec<FilterPrimitive>, clause: Clause) -> Result<Self> {
        if filters.is_empty() {
            return Err(Error::validation("a filter group requires at least one filter"));
        }
        Ok(Self { clause, filters })
    }

    /// Wrap one primitive in an `AND` group.
    pub fn single(filter: FilterPrimitive) -> Self {
        Self {
            clause: Clause::And,
            filters: vec![filter],
        }
    }

    pub fn clause(&self) -> Clause {
        self.clause
    }

    pub fn filters(&self) -> &[FilterPrimitive] {
        &self.filters
    }

    /// Same filters joined by a different clause.
    pub fn with_clause(&self, clause: Clause) -> Self {
        Self {
            clause,
            filters: self.filters.clone(),
        }
    }

    pub fn contains(&self, filter: &FilterPrimitive) -> bool {
        self.filters.contains(filter)
    }

    /// Wire record: `{"filterClause": .., "filters": [..]}`.
    pub fn to_value(&self) -> Value {
        json!({
            "filterClause": self.clause.as_str(),
            "filters": self.filters.iter().map(FilterPrimitive::to_value).collect::<Vec<_>>(),
        })
    }

    /// Rebuild a group from its wire record.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed("filter group must be a JSON object"))?;

        let clause = required_str(obj, "filterClause")?;
        let clause: Clause = clause
            .parse()
            .map_err(|_| Error::malformed(format!("unrecognized filterClause '{}'", clause)))?;

        let filters = match obj.get("filters") {
            Some(Value::Array(items)) => items
                .iter()
                .map(FilterPrimitive::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "'filters' must be an array, got {}",
                    other
                )))
            }
            None => return Err(Error::malformed("missing 'filters'")),
        };

        Self::new(filters, clause).map_err(|_| Error::malformed("'filters' must not be empty"))
    }
}

impl From<FilterPrimitive> for FilterGroup {
    fn from(filter: FilterPrimitive) -> Self {
        Self::single(filter)
    }
}

impl std::fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
