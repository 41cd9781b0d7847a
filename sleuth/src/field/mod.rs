//! Typed field descriptors.
//!
//! A [`FieldDescriptor`] binds one server term to one [`ValueType`]. The
//! factory methods build single-primitive [`FilterGroup`]s, coercing and
//! validating values by value type, so callers never spell operator names.
//! Fields themselves are plain data; see [`catalog`] for the known ones.

pub mod catalog;
pub mod timestamp;


use crate::filter::{Clause, FilterGroup, FilterPrimitive, FilterValue, Operator, Scalar};
use crate::{Error, Result};

pub use catalog::{alert, file_event, lookup, Catalog};
pub use timestamp::{IntoTimestamp, IntoWindow};

/// Value type of a field; decides which factories are legal and how values are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Boolean,
    Numeric,
    Timestamp,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Numeric => "numeric",
            ValueType::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named server term with a fixed value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    term: &'static str,
    value_type: ValueType,
}

impl FieldDescriptor {
    pub const fn new(term: &'static str, value_type: ValueType) -> Self {
        Self { term, value_type }
    }

    pub const fn string(term: &'static str) -> Self {
        Self::new(term, ValueType::String)
    }

    pub const fn boolean(term: &'static str) -> Self {
        Self::new(term, ValueType::Boolean)
    }

    pub const fn numeric(term: &'static str) -> Self {
        Self::new(term, ValueType::Numeric)
    }

    pub const fn timestamp(term: &'static str) -> Self {
        Self::new(term, ValueType::Timestamp)
    }

    pub fn term(&self) -> &'static str {
        self.term
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    // Equality and membership (every value type)

    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::Equals, value)
    }

    pub fn not_eq(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::NotEquals, value)
    }

    pub fn is_in<I, V>(&self, values: I) -> Result<FilterGroup>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.list_group(Operator::IsIn, values)
    }

    pub fn not_in<I, V>(&self, values: I) -> Result<FilterGroup>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.list_group(Operator::NotIn, values)
    }

    pub fn exists(&self) -> Result<FilterGroup> {
        self.group(Operator::Exists, None)
    }

    pub fn not_exists(&self) -> Result<FilterGroup> {
        self.group(Operator::DoesNotExist, None)
    }

    // String fields

    pub fn contains(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        self.require(ValueType::String, "contains")?;
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::Contains, value)
    }

    pub fn not_contains(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        self.require(ValueType::String, "not_contains")?;
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::DoesNotContain, value)
    }

    // Numeric fields

    pub fn greater_than(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        self.require(ValueType::Numeric, "greater_than")?;
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::GreaterThan, value)
    }

    pub fn less_than(&self, value: impl Into<Scalar>) -> Result<FilterGroup> {
        self.require(ValueType::Numeric, "less_than")?;
        let value = self.coerce(value.into())?;
        self.scalar_group(Operator::LessThan, value)
    }

    // Timestamp fields

    pub fn on(&self, ts: impl IntoTimestamp) -> Result<FilterGroup> {
        self.timestamp_group(Operator::On, ts, "on")
    }

    pub fn on_or_after(&self, ts: impl IntoTimestamp) -> Result<FilterGroup> {
        self.timestamp_group(Operator::OnOrAfter, ts, "on_or_after")
    }

    pub fn on_or_before(&self, ts: impl IntoTimestamp) -> Result<FilterGroup> {
        self.timestamp_group(Operator::OnOrBefore, ts, "on_or_before")
    }

    /// Events inside a relative window ending now, e.g. `"P7D"` or `"15m"`.
    pub fn within_the_last(&self, window: impl IntoWindow) -> Result<FilterGroup> {
        self.require(ValueType::Timestamp, "within_the_last")?;
        let window = timestamp::format_window(window.into_window()?)?;
        self.scalar_group(Operator::WithinTheLast, Scalar::String(window))
    }

    /// Inclusive range: `ON_OR_AFTER start` and `ON_OR_BEFORE end` in one `AND` group.
    pub fn in_range(&self, start: impl IntoTimestamp, end: impl IntoTimestamp) -> Result<FilterGroup> {
        self.require(ValueType::Timestamp, "in_range")?;
        let start = start.into_timestamp()?;
        let end = end.into_timestamp()?;
        if start > end {
            return Err(Error::validation(format!(
                "range start {} is after end {} for '{}'",
                timestamp::format_timestamp(&start),
                timestamp::format_timestamp(&end),
                self.term
            )));
        }
        self.range_group(&start, &end)
    }

    /// The whole UTC day containing `ts`, first to last millisecond.
    pub fn on_same_day(&self, ts: impl IntoTimestamp) -> Result<FilterGroup> {
        self.require(ValueType::Timestamp, "on_same_day")?;
        let (start, end) = timestamp::day_bounds(&ts.into_timestamp()?)?;
        self.range_group(&start, &end)
    }

    // Helpers

    fn require(&self, expected: ValueType, method: &str) -> Result<()> {
        if self.value_type == expected {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "{} is not supported on {} field '{}'",
                method, self.value_type, self.term
            )))
        }
    }

    /// Coerce a caller value to what this field's value type puts on the wire.
    fn coerce(&self, value: Scalar) -> Result<Scalar> {
        match (self.value_type, value) {
            (ValueType::String, Scalar::String(s)) => Ok(Scalar::String(s)),

            (ValueType::Boolean, Scalar::Boolean(b)) => Ok(Scalar::Boolean(b)),
            (ValueType::Boolean, Scalar::String(s)) if s.eq_ignore_ascii_case("true") => {
                Ok(Scalar::Boolean(true))
            }
            (ValueType::Boolean, Scalar::String(s)) if s.eq_ignore_ascii_case("false") => {
                Ok(Scalar::Boolean(false))
            }

            (ValueType::Numeric, Scalar::Integer(n)) => Ok(Scalar::Integer(n)),
            (ValueType::Numeric, Scalar::Float(x)) if x.is_finite() => Ok(Scalar::Float(x)),
            (ValueType::Numeric, Scalar::Float(x)) => Err(Error::validation(format!(
                "'{}' is not a finite number for field '{}'",
                x, self.term
            ))),
            (ValueType::Numeric, Scalar::String(s)) => parse_number(&s).ok_or_else(|| {
                Error::validation(format!("'{}' is not a number for field '{}'", s, self.term))
            }),

            (ValueType::Timestamp, Scalar::String(s)) => Ok(Scalar::String(
                timestamp::format_timestamp(&s.into_timestamp()?),
            )),
            (ValueType::Timestamp, Scalar::Integer(n)) => Ok(Scalar::String(
                timestamp::format_timestamp(&n.into_timestamp()?),
            )),
            (ValueType::Timestamp, Scalar::Float(x)) => Ok(Scalar::String(
                timestamp::format_timestamp(&x.into_timestamp()?),
            )),

            (value_type, other) => Err(Error::validation(format!(
                "{} field '{}' does not accept {} value '{}'",
                value_type,
                self.term,
                other.kind(),
                other
            ))),
        }
    }

    fn group(&self, operator: Operator, value: Option<FilterValue>) -> Result<FilterGroup> {
        FilterPrimitive::new(self.term, operator, value).map(FilterGroup::single)
    }

    fn scalar_group(&self, operator: Operator, value: Scalar) -> Result<FilterGroup> {
        self.group(operator, Some(FilterValue::Scalar(value)))
    }

    fn list_group<I, V>(&self, operator: Operator, values: I) -> Result<FilterGroup>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        let values = values
            .into_iter()
            .map(|v| self.coerce(v.into()))
            .collect::<Result<Vec<_>>>()?;
        if values.is_empty() {
            return Err(Error::validation(format!(
                "at least one value required for {} on '{}'",
                operator, self.term
            )));
        }
        self.group(operator, Some(FilterValue::List(values)))
    }

    fn timestamp_group(&self, operator: Operator, ts: impl IntoTimestamp, method: &str) -> Result<FilterGroup> {
        self.require(ValueType::Timestamp, method)?;
        let ts = timestamp::format_timestamp(&ts.into_timestamp()?);
        self.scalar_group(operator, Scalar::String(ts))
    }

    fn range_group(
        &self,
        start: &chrono::DateTime<chrono::Utc>,
        end: &chrono::DateTime<chrono::Utc>,
    ) -> Result<FilterGroup> {
        let filters = vec![
            FilterPrimitive::scalar(self.term, Operator::OnOrAfter, timestamp::format_timestamp(start))?,
            FilterPrimitive::scalar(self.term, Operator::OnOrBefore, timestamp::format_timestamp(end))?,
        ];
        FilterGroup::new(filters, Clause::And)
    }
}

impl std::fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.term, self.value_type)
    }
}

fn parse_number(s: &str) -> Option<Scalar> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(Scalar::Integer(n));
    }
    s.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .map(Scalar::Float)
}
