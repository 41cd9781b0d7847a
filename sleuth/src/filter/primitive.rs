//! A single `(term, operator, value)` predicate.

use serde_json::{json, Value};

use super::operator::{Arity, Operator};
use super::required_str;
use super::value::{FilterValue, Scalar};
use crate::{Error, Result};

/// One predicate against a server-side term.
///
/// Construction checks the operator's arity, so every value of this type is
/// well-formed on the wire. There are no mutators; build a new primitive instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPrimitive {
    term: String,
    operator: Operator,
    value: Option<FilterValue>,
}

impl FilterPrimitive {
    /// Build a primitive, validating the value against the operator's arity.
    pub fn new(
        term: impl Into<String>,
        operator: Operator,
        value: Option<FilterValue>,
    ) -> Result<Self> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(Error::validation("filter term must not be empty"));
        }

        // JSON has no NaN or infinity
        let non_finite = value
            .iter()
            .flat_map(FilterValue::scalars)
            .find(|s| matches!(s, Scalar::Float(x) if !x.is_finite()));
        if let Some(bad) = non_finite {
            return Err(Error::validation(format!(
                "{} on '{}' requires a finite number, got {}",
                operator, term, bad
            )));
        }

        match (operator.arity(), &value) {
            (Arity::None, None) => {}
            (Arity::None, Some(_)) => {
                return Err(Error::validation(format!(
                    "{} on '{}' does not take a value",
                    operator, term
                )));
            }
            (Arity::List, Some(FilterValue::List(items))) if !items.is_empty() => {}
            (Arity::List, Some(FilterValue::List(_))) => {
                return Err(Error::validation(format!(
                    "{} on '{}' requires at least one value",
                    operator, term
                )));
            }
            (Arity::List, _) => {
                return Err(Error::validation(format!(
                    "{} on '{}' requires a list of values",
                    operator, term
                )));
            }
            (Arity::Scalar, Some(FilterValue::Scalar(_))) => {}
            (Arity::Scalar, Some(FilterValue::List(_))) => {
                return Err(Error::validation(format!(
                    "{} on '{}' takes a single value, not a list",
                    operator, term
                )));
            }
            (Arity::Scalar, None) => {
                return Err(Error::validation(format!(
                    "{} on '{}' requires a value",
                    operator, term
                )));
            }
        }

        Ok(Self {
            term,
            operator,
            value,
        })
    }

    /// Predicate carrying exactly one scalar.
    pub fn scalar(term: impl Into<String>, operator: Operator, value: impl Into<Scalar>) -> Result<Self> {
        Self::new(term, operator, Some(FilterValue::Scalar(value.into())))
    }

    /// Predicate carrying an ordered list of scalars.
    pub fn list(term: impl Into<String>, operator: Operator, values: Vec<Scalar>) -> Result<Self> {
        Self::new(term, operator, Some(FilterValue::List(values)))
    }

    /// Existence predicate (no value).
    pub fn presence(term: impl Into<String>, operator: Operator) -> Result<Self> {
        Self::new(term, operator, None)
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    /// Wire record: `{"operator": .., "term": .., "value": ..}` with `null` for no value.
    pub fn to_value(&self) -> Value {
        json!({
            "operator": self.operator.as_str(),
            "term": self.term,
            "value": self.value.as_ref().map_or(Value::Null, FilterValue::to_value),
        })
    }

    /// Rebuild a primitive from its wire record.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed("filter must be a JSON object"))?;

        let operator = required_str(obj, "operator")?;
        let operator: Operator = operator
            .parse()
            .map_err(|_| Error::malformed(format!("unrecognized operator '{}'", operator)))?;
        let term = required_str(obj, "term")?;

        let value = match obj.get("value") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(FilterValue::from_value(raw).ok_or_else(|| {
                Error::malformed(format!("unsupported value for term '{}': {}", term, raw))
            })?),
        };

        Self::new(term, operator, value).map_err(|e| match e {
            Error::Validation(msg) => Error::MalformedPayload(msg),
            other => other,
        })
    }
}

impl std::fmt::Display for FilterPrimitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
