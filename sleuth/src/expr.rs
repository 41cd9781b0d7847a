//! Field expression micro-language.
//!
//! One expression becomes one filter group:
//!
//! - `term=value`, `term<>value` (or `!=`): equals / not equals
//! - `term=[a,b]`, `term<>[a,b]`: is in / not in
//! - `term~=value`, `term!~value`: contains / does not contain
//! - `term>=ts`, `term<=ts`, `term@ts`: on or after / on or before / on (timestamps)
//! - `term>n`, `term<n`: greater / less than (numbers)
//! - `term:last=P7D`: within the last window
//! - `term:exists`, `term:missing`

use crate::field::{Catalog, FieldDescriptor};
use crate::filter::FilterGroup;
use crate::{Error, Result};

/// Operators recognized after a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprOp {
    Eq,
    NotEq,
    Contains,
    NotContains,
    OnOrAfter,
    OnOrBefore,
    On,
    GreaterThan,
    LessThan,
}

/// Parse an expression, resolving the term across every catalog.
pub fn parse_filter(input: &str) -> Result<FilterGroup> {
    parse_with(input, crate::field::lookup)
}

/// Parse an expression, resolving the term in one catalog only.
pub fn parse_filter_in(catalog: Catalog, input: &str) -> Result<FilterGroup> {
    parse_with(input, |term| catalog.lookup(term))
}

fn parse_with(input: &str, lookup: impl Fn(&str) -> Option<FieldDescriptor>) -> Result<FilterGroup> {
    let input = input.trim();
    let term_end = input
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(input.len());
    let (term, rest) = input.split_at(term_end);

    if term.is_empty() {
        return Err(Error::validation(format!("expression '{}' has no field name", input)));
    }
    let field = lookup(term)
        .ok_or_else(|| Error::validation(format!("unknown field '{}'", term)))?;

    // Keyword suffixes
    if let Some(keyword) = rest.strip_prefix(':') {
        return match keyword {
            "exists" => field.exists(),
            "missing" => field.not_exists(),
            k => match k.strip_prefix("last=") {
                Some(window) => field.within_the_last(window.trim()),
                None => Err(Error::validation(format!(
                    "unknown keyword ':{}' in '{}'",
                    k, input
                ))),
            },
        };
    }

    let (op, value) = split_operator(rest)
        .ok_or_else(|| Error::validation(format!("expression '{}' has no operator", input)))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("expression '{}' has no value", input)));
    }

    match op {
        ExprOp::Eq => match parse_list(value) {
            Some(items) => field.is_in(items),
            None => field.eq(value),
        },
        ExprOp::NotEq => match parse_list(value) {
            Some(items) => field.not_in(items),
            None => field.not_eq(value),
        },
        ExprOp::Contains => field.contains(value),
        ExprOp::NotContains => field.not_contains(value),
        ExprOp::OnOrAfter => field.on_or_after(value),
        ExprOp::OnOrBefore => field.on_or_before(value),
        ExprOp::On => field.on(value),
        ExprOp::GreaterThan => field.greater_than(value),
        ExprOp::LessThan => field.less_than(value),
    }
}

/// Split the operator off the front of `rest` (2-char operators checked first).
fn split_operator(rest: &str) -> Option<(ExprOp, &str)> {
    const OPS: [(&str, ExprOp); 11] = [
        ("~=", ExprOp::Contains),
        ("!~", ExprOp::NotContains),
        ("<>", ExprOp::NotEq),
        ("!=", ExprOp::NotEq),
        (">=", ExprOp::OnOrAfter),
        ("<=", ExprOp::OnOrBefore),
        ("=", ExprOp::Eq),
        (">", ExprOp::GreaterThan),
        ("<", ExprOp::LessThan),
        ("@", ExprOp::On),
        // Tolerate "term == value"
        ("==", ExprOp::Eq),
    ];

    let rest = rest.trim_start();
    OPS.iter()
        .filter(|(token, _)| rest.starts_with(token))
        .max_by_key(|(token, _)| token.len())
        .map(|(token, op)| (*op, &rest[token.len()..]))
}

/// `[a, b, c]` -> `["a", "b", "c"]`; anything else is a single value.
fn parse_list(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
