//! Tests for filter primitives and groups.

use super::*;
use crate::field::file_event;
use serde_json::json;

fn primitive(term: &str, op: Operator, value: &str) -> FilterPrimitive {
    FilterPrimitive::scalar(term, op, value).unwrap()
}

// ===== Primitive arity =====

#[test]
fn test_exists_without_value() {
    let f = FilterPrimitive::presence("fileName", Operator::Exists).unwrap();
    assert_eq!(
        f.to_value(),
        json!({"operator": "EXISTS", "term": "fileName", "value": null})
    );
}

#[test]
fn test_exists_with_value_fails() {
    let err = FilterPrimitive::scalar("fileName", Operator::Exists, "x").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(FilterPrimitive::scalar("fileName", Operator::DoesNotExist, true).is_err());
}

#[test]
fn test_is_in_requires_non_empty_list() {
    assert!(matches!(
        FilterPrimitive::list("severity", Operator::IsIn, vec![]),
        Err(Error::Validation(_))
    ));
    assert!(FilterPrimitive::list("severity", Operator::NotIn, vec![]).is_err());
    assert!(FilterPrimitive::scalar("severity", Operator::IsIn, "HIGH").is_err());
    assert!(FilterPrimitive::presence("severity", Operator::IsIn).is_err());
}

#[test]
fn test_scalar_operators_reject_lists_and_missing_values() {
    assert!(FilterPrimitive::list("filePath", Operator::Equals, vec![Scalar::from("/a")]).is_err());
    assert!(FilterPrimitive::presence("filePath", Operator::Contains).is_err());
    assert!(FilterPrimitive::presence("eventTimestamp", Operator::WithinTheLast).is_err());
}

#[test]
fn test_non_finite_floats_rejected() {
    for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            FilterPrimitive::scalar("fileSize", Operator::Equals, x),
            Err(Error::Validation(_))
        ));
        assert!(FilterPrimitive::list("riskScore", Operator::IsIn, vec![Scalar::from(1.0), Scalar::from(x)]).is_err());
    }
}

#[test]
fn test_float_edge_values_round_trip() {
    for x in [-0.0, 0.5, 1e300, -1e-300, f64::MAX, f64::MIN_POSITIVE] {
        let f = FilterPrimitive::scalar("riskScore", Operator::GreaterThan, x).unwrap();
        let wire = f.to_value();
        assert!(!wire["value"].is_null(), "{}", x);
        assert_eq!(FilterPrimitive::from_value(&wire).unwrap(), f);
    }
}

#[test]
fn test_empty_term_fails() {
    assert!(FilterPrimitive::scalar(" ", Operator::Equals, "x").is_err());
}

#[test]
fn test_structural_equality() {
    assert_eq!(
        primitive("filePath", Operator::Equals, "/etc/passwd"),
        primitive("filePath", Operator::Equals, "/etc/passwd")
    );
    assert_ne!(
        primitive("filePath", Operator::Equals, "/etc/passwd"),
        primitive("filePath", Operator::NotEquals, "/etc/passwd")
    );
}

// ===== Primitive decoding =====

#[test]
fn test_primitive_from_value() {
    let value = json!({"operator": "IS_IN", "term": "severity", "value": ["HIGH", "MEDIUM"]});
    let f = FilterPrimitive::from_value(&value).unwrap();
    assert_eq!(f.operator(), Operator::IsIn);
    assert_eq!(
        f.value(),
        Some(&FilterValue::List(vec![Scalar::from("HIGH"), Scalar::from("MEDIUM")]))
    );
    assert_eq!(f.to_value(), value);
}

#[test]
fn test_primitive_from_value_missing_value_key_is_none() {
    let f = FilterPrimitive::from_value(&json!({"operator": "DOES_NOT_EXIST", "term": "md5Checksum"}))
        .unwrap();
    assert!(f.value().is_none());
}

#[test]
fn test_primitive_from_value_malformed() {
    let cases = [
        json!("EQUALS"),
        json!({"term": "fileName", "value": "a"}),
        json!({"operator": "EQUALS", "value": "a"}),
        json!({"operator": "LIKE", "term": "fileName", "value": "a"}),
        json!({"operator": "EQUALS", "term": 7, "value": "a"}),
        json!({"operator": "EQUALS", "term": "fileName", "value": {"nested": true}}),
        json!({"operator": "EXISTS", "term": "fileName", "value": "a"}),
        json!({"operator": "IS_IN", "term": "fileName", "value": []}),
    ];
    for case in cases {
        let err = FilterPrimitive::from_value(&case).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)), "{}: {:?}", case, err);
    }
}

#[test]
fn test_numeric_values_keep_their_kind() {
    let value = json!({"operator": "GREATER_THAN", "term": "fileSize", "value": 1024});
    let f = FilterPrimitive::from_value(&value).unwrap();
    assert_eq!(f.value(), Some(&FilterValue::Scalar(Scalar::Integer(1024))));

    let value = json!({"operator": "LESS_THAN", "term": "riskScore", "value": 2.5});
    let f = FilterPrimitive::from_value(&value).unwrap();
    assert_eq!(f.value(), Some(&FilterValue::Scalar(Scalar::Float(2.5))));
}

// ===== Operators and clauses =====

#[test]
fn test_operator_names_round_trip() {
    for op in Operator::ALL {
        assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        assert_eq!(op.to_string(), op.as_str());
    }
    assert!("equals".parse::<Operator>().is_err());
}

#[test]
fn test_operator_serde_names_match_wire() {
    for op in Operator::ALL {
        assert_eq!(serde_json::to_value(op).unwrap(), json!(op.as_str()));
    }
}

#[test]
fn test_clause_parse() {
    assert_eq!("AND".parse::<Clause>().unwrap(), Clause::And);
    assert_eq!("OR".parse::<Clause>().unwrap(), Clause::Or);
    assert!(matches!("NOT".parse::<Clause>(), Err(Error::Validation(_))));
}

// ===== Groups =====

#[test]
fn test_empty_group_fails() {
    assert!(matches!(
        FilterGroup::new(vec![], Clause::And),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_group_from_single_primitive() {
    let f = primitive("filePath", Operator::Equals, "/etc/passwd");
    let group: FilterGroup = f.clone().into();
    assert_eq!(group.clause(), Clause::And);
    assert!(group.contains(&f));
    assert_eq!(
        group.to_value(),
        json!({
            "filterClause": "AND",
            "filters": [{"operator": "EQUALS", "term": "filePath", "value": "/etc/passwd"}]
        })
    );
}

#[test]
fn test_equality_scenario_via_field() {
    let group = file_event::FILE_PATH.eq("/etc/passwd").unwrap();
    assert_eq!(
        group.to_string(),
        r#"{"filterClause":"AND","filters":[{"operator":"EQUALS","term":"filePath","value":"/etc/passwd"}]}"#
    );
}

#[test]
fn test_with_clause_returns_new_group() {
    let group = FilterGroup::new(
        vec![
            primitive("fileName", Operator::Contains, "secret"),
            primitive("fileName", Operator::Contains, "confidential"),
        ],
        Clause::And,
    )
    .unwrap();
    let or_group = group.with_clause(Clause::Or);
    assert_eq!(group.clause(), Clause::And);
    assert_eq!(or_group.clause(), Clause::Or);
    assert_eq!(or_group.filters(), group.filters());
}

#[test]
fn test_group_round_trip_preserves_order() {
    let group = FilterGroup::new(
        vec![
            primitive("osHostName", Operator::Equals, "b"),
            FilterPrimitive::presence("md5Checksum", Operator::Exists).unwrap(),
            primitive("osHostName", Operator::Equals, "a"),
        ],
        Clause::Or,
    )
    .unwrap();
    assert_eq!(FilterGroup::from_value(&group.to_value()).unwrap(), group);
}

#[test]
fn test_group_from_value_malformed() {
    let good = json!({"operator": "EQUALS", "term": "fileName", "value": "a"});
    let cases = [
        json!([good.clone()]),
        json!({"filters": [good.clone()]}),
        json!({"filterClause": "AND"}),
        json!({"filterClause": "and", "filters": [good.clone()]}),
        json!({"filterClause": "AND", "filters": good.clone()}),
        json!({"filterClause": "AND", "filters": []}),
        json!({"filterClause": "AND", "filters": [{"operator": "EQUALS"}]}),
    ];
    for case in cases {
        let err = FilterGroup::from_value(&case).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)), "{}: {:?}", case, err);
    }
}
