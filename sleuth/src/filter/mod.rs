//! Filter expression model.
//!
//! A [`FilterPrimitive`] is one `(term, operator, value)` predicate. Primitives
//! are collected into a [`FilterGroup`] joined by a [`Clause`]; groups are what
//! field factories return and what a query combines.
//!
//! Wire shapes:
//!
//! ```text
//! Primitive := { "operator": NAME, "term": string, "value": Scalar | [Scalar] | null }
//! Group     := { "filterClause": "AND"|"OR", "filters": [Primitive, ...] }
//! ```

mod group;
mod operator;
mod primitive;
mod value;

use serde_json::{Map, Value};

use crate::{Error, Result};

pub use group::FilterGroup;
pub use operator::{Arity, Clause, Operator};
pub use primitive::FilterPrimitive;
pub use value::{FilterValue, Scalar};

/// Fetch a required string member of a wire record.
pub(crate) fn required_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(Error::malformed(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
        None => Err(Error::malformed(format!("missing '{}'", key))),
    }
}

#[cfg(test)]
mod tests;
