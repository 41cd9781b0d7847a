//! Filter operators and boolean clauses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Operator applied by a single filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    IsIn,
    NotIn,
    Contains,
    DoesNotContain,
    Exists,
    DoesNotExist,
    On,
    OnOrAfter,
    OnOrBefore,
    WithinTheLast,
    GreaterThan,
    LessThan,
}

/// How many values an operator carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value (`EXISTS`, `DOES_NOT_EXIST`).
    None,
    /// Exactly one scalar.
    Scalar,
    /// A non-empty list of scalars (`IS_IN`, `NOT_IN`).
    List,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::IsIn,
        Operator::NotIn,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::Exists,
        Operator::DoesNotExist,
        Operator::On,
        Operator::OnOrAfter,
        Operator::OnOrBefore,
        Operator::WithinTheLast,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    /// Wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::IsIn => "IS_IN",
            Operator::NotIn => "NOT_IN",
            Operator::Contains => "CONTAINS",
            Operator::DoesNotContain => "DOES_NOT_CONTAIN",
            Operator::Exists => "EXISTS",
            Operator::DoesNotExist => "DOES_NOT_EXIST",
            Operator::On => "ON",
            Operator::OnOrAfter => "ON_OR_AFTER",
            Operator::OnOrBefore => "ON_OR_BEFORE",
            Operator::WithinTheLast => "WITHIN_THE_LAST",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessThan => "LESS_THAN",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Exists | Operator::DoesNotExist => Arity::None,
            Operator::IsIn | Operator::NotIn => Arity::List,
            _ => Arity::Scalar,
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown operator '{}'", s)))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator joining sibling filters or groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Clause {
    #[default]
    And,
    Or,
}

impl Clause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clause::And => "AND",
            Clause::Or => "OR",
        }
    }
}

impl FromStr for Clause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AND" => Ok(Clause::And),
            "OR" => Ok(Clause::Or),
            other => Err(Error::validation(format!(
                "clause must be AND or OR, got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
