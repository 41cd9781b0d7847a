//! The root search request: groups, clause, paging and sort.
//!
//! ```text
//! Query := { "groupClause": "AND"|"OR", "groups": [Group, ...],
//!            "pageSize": int, "pageNumber": int (optional), "pageToken": string (optional),
//!            "srtKey": string, "srtDirection": "asc"|"desc" }
//! ```
//!
//! Older API versions spell the paging and sort keys differently; that is the
//! only thing a [`Dialect`] changes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::{required_str, Clause, FilterGroup};
use crate::{Error, Result};

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10_000;

/// Largest page the search service accepts.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Default sort key for file event searches.
pub const DEFAULT_SORT_KEY: &str = "eventId";

/// Sort order of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::validation(format!(
                "sort direction must be asc or desc, got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key naming used by a search API version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `pgSize`, `pgNum`, `pgToken`, `srtKey`, `srtDir`
    V1,
    /// `pageSize`, `pageNumber`, `pageToken`, `srtKey`, `srtDirection`
    #[default]
    V2,
}

struct Keys {
    page_size: &'static str,
    page_number: &'static str,
    page_token: &'static str,
    sort_key: &'static str,
    sort_direction: &'static str,
}

const V1_KEYS: Keys = Keys {
    page_size: "pgSize",
    page_number: "pgNum",
    page_token: "pgToken",
    sort_key: "srtKey",
    sort_direction: "srtDir",
};

const V2_KEYS: Keys = Keys {
    page_size: "pageSize",
    page_number: "pageNumber",
    page_token: "pageToken",
    sort_key: "srtKey",
    sort_direction: "srtDirection",
};

impl Dialect {
    fn keys(&self) -> &'static Keys {
        match self {
            Dialect::V1 => &V1_KEYS,
            Dialect::V2 => &V2_KEYS,
        }
    }

    /// Guess the dialect of a wire record from the keys it carries.
    fn detect(obj: &Map<String, Value>) -> Self {
        let v1 = Dialect::V1.keys();
        if obj.contains_key(v1.page_size) || obj.contains_key(v1.sort_direction) {
            Dialect::V1
        } else {
            Dialect::V2
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "v1" | "1" => Ok(Dialect::V1),
            "v2" | "2" => Ok(Dialect::V2),
            other => Err(Error::validation(format!(
                "dialect must be v1 or v2, got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::V1 => f.write_str("v1"),
            Dialect::V2 => f.write_str("v2"),
        }
    }
}

/// A search request.
///
/// `groups` and `clause` are fixed at construction; paging and sort can be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    clause: Clause,
    groups: Vec<FilterGroup>,
    page_size: u32,
    page_number: Option<u32>,
    page_token: Option<String>,
    sort_key: String,
    sort_direction: SortDirection,
    dialect: Dialect,
}

impl Query {
    /// Every group must match.
    pub fn all<I: IntoIterator<Item = FilterGroup>>(groups: I) -> Result<Self> {
        Self::combine(Clause::And, groups.into_iter().collect())
    }

    /// At least one group must match.
    pub fn any<I: IntoIterator<Item = FilterGroup>>(groups: I) -> Result<Self> {
        Self::combine(Clause::Or, groups.into_iter().collect())
    }

    /// A query with no filter groups, matching everything.
    pub fn unfiltered() -> Self {
        Self::with_groups(Clause::And, Vec::new())
    }

    fn combine(clause: Clause, groups: Vec<FilterGroup>) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::validation(
                "a query requires at least one filter group; use Query::unfiltered() to match everything",
            ));
        }
        Ok(Self::with_groups(clause, groups))
    }

    fn with_groups(clause: Clause, groups: Vec<FilterGroup>) -> Self {
        Self {
            clause,
            groups,
            page_size: DEFAULT_PAGE_SIZE,
            page_number: None,
            page_token: None,
            sort_key: DEFAULT_SORT_KEY.to_string(),
            sort_direction: SortDirection::default(),
            dialect: Dialect::default(),
        }
    }

    /// Check if this query matches everything (no groups).
    pub fn is_match_all(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clause(&self) -> Clause {
        self.clause
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    // Setters

    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::validation(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        self.page_size = page_size;
        Ok(())
    }

    pub fn set_page_number(&mut self, page_number: Option<u32>) {
        self.page_number = page_number;
    }

    pub fn set_page_token(&mut self, page_token: Option<String>) {
        self.page_token = page_token;
    }

    pub fn set_sort_key(&mut self, sort_key: impl Into<String>) -> Result<()> {
        let sort_key = sort_key.into();
        if sort_key.trim().is_empty() {
            return Err(Error::validation("sort key must not be empty"));
        }
        self.sort_key = sort_key;
        Ok(())
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    // Chainable forms

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        self.set_page_size(page_size)?;
        Ok(self)
    }

    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Result<Self> {
        self.set_sort_key(sort_key)?;
        Ok(self)
    }

    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    // Wire format

    /// Request payload in this query's dialect. Unset optional fields are omitted.
    pub fn to_value(&self) -> Value {
        let keys = self.dialect.keys();
        let mut obj = Map::new();
        obj.insert("groupClause".to_string(), Value::from(self.clause.as_str()));
        obj.insert(
            "groups".to_string(),
            Value::Array(self.groups.iter().map(FilterGroup::to_value).collect()),
        );
        obj.insert(keys.page_size.to_string(), Value::from(self.page_size));
        if let Some(n) = self.page_number {
            obj.insert(keys.page_number.to_string(), Value::from(n));
        }
        if let Some(token) = &self.page_token {
            obj.insert(keys.page_token.to_string(), Value::from(token.as_str()));
        }
        obj.insert(keys.sort_key.to_string(), Value::from(self.sort_key.as_str()));
        obj.insert(
            keys.sort_direction.to_string(),
            Value::from(self.sort_direction.as_str()),
        );
        Value::Object(obj)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Rebuild a query from a request payload of either dialect.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed("query must be a JSON object"))?;
        let dialect = Dialect::detect(obj);
        let keys = dialect.keys();

        let clause = required_str(obj, "groupClause")?;
        let clause: Clause = clause
            .parse()
            .map_err(|_| Error::malformed(format!("unrecognized groupClause '{}'", clause)))?;

        let groups = match obj.get("groups") {
            Some(Value::Array(items)) => items
                .iter()
                .map(FilterGroup::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "'groups' must be an array, got {}",
                    other
                )))
            }
            None => return Err(Error::malformed("missing 'groups'")),
        };

        let page_size = match optional_u32(obj, keys.page_size)? {
            Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
            Some(n) => {
                return Err(Error::malformed(format!(
                    "'{}' must be between 1 and {}, got {}",
                    keys.page_size, MAX_PAGE_SIZE, n
                )))
            }
            None => return Err(Error::malformed(format!("missing '{}'", keys.page_size))),
        };
        let page_number = optional_u32(obj, keys.page_number)?;

        let page_token = match obj.get(keys.page_token) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(Error::malformed(format!(
                    "'{}' must be a string, got {}",
                    keys.page_token, other
                )))
            }
        };

        let sort_key = required_str(obj, keys.sort_key)?;
        if sort_key.trim().is_empty() {
            return Err(Error::malformed(format!("'{}' must not be empty", keys.sort_key)));
        }
        let sort_direction = required_str(obj, keys.sort_direction)?;
        let sort_direction: SortDirection = sort_direction.parse().map_err(|_| {
            Error::malformed(format!(
                "unrecognized {} '{}'",
                keys.sort_direction, sort_direction
            ))
        })?;

        tracing::debug!(
            groups = groups.len(),
            %dialect,
            "decoded query"
        );

        Ok(Self {
            clause,
            groups,
            page_size,
            page_number,
            page_token,
            sort_key: sort_key.to_string(),
            sort_direction,
            dialect,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

/// Read an optional non-negative integer member; null counts as absent.
fn optional_u32(obj: &Map<String, Value>, key: &str) -> Result<Option<u32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                Error::malformed(format!("'{}' must be a non-negative integer, got {}", key, v))
            }),
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json())
    }
}
