use serde_json::{json, Value};

use super::{FieldFlag, ValidationEngine};
use statline_types::{RawRecord, ValidationRule};

fn record(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn scores_rule() -> ValidationRule {
    ValidationRule::new()
        .require(["team", "score", "timestamp"])
        .range("score", 0.0, 50.0)
        .team_count(3)
}

#[test]
fn test_missing_required_field_rejects() {
    let records = vec![
        record(json!({"team": "STL", "score": 4, "timestamp": 1})),
        record(json!({"team": "CHC", "timestamp": 1})),
        record(json!({"team": "MIL", "score": null, "timestamp": 1})),
    ];
    let outcome = ValidationEngine::validate("scores/live", records, &scores_rule());

    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.rejected_count, 2);
    assert!(outcome.warnings.iter().any(|w| w.contains("rejected 2 record(s)") && w.contains("score")));
}

#[test]
fn test_out_of_range_is_flagged_not_rejected() {
    let records = vec![
        record(json!({"team": "STL", "score": 75, "timestamp": 1})),
        record(json!({"team": "CHC", "score": "seven", "timestamp": 1})),
        record(json!({"team": "MIL", "score": 3, "timestamp": 1})),
    ];
    let outcome = ValidationEngine::validate("scores/live", records, &scores_rule());

    assert_eq!(outcome.rejected_count, 0);
    assert_eq!(outcome.accepted.len(), 3);
    assert_eq!(outcome.accepted[0].flags.get("score"), Some(&FieldFlag::OutOfRange { value: 75.0 }));
    assert_eq!(outcome.accepted[1].flags.get("score"), Some(&FieldFlag::NonNumeric));
    assert!(outcome.accepted[2].flags.is_empty());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_cardinality_mismatch_is_warning() {
    let records = vec![
        record(json!({"team": "STL", "score": 1, "timestamp": 1})),
        record(json!({"team": "STL", "score": 2, "timestamp": 2})),
    ];
    let outcome = ValidationEngine::validate("standings", records, &scores_rule());

    assert_eq!(outcome.accepted.len(), 2);
    assert_eq!(outcome.warnings, vec!["standings: expected 3 distinct team values, found 1"]);
}

#[test]
fn test_allowed_values_warn() {
    let rule = ValidationRule::new().require(["player"]).allow("grade", ["FR", "SO", "JR", "SR"]);
    let records = vec![
        record(json!({"player": "A", "grade": "JR"})),
        record(json!({"player": "B", "grade": "GR"})),
    ];
    let outcome = ValidationEngine::validate("recruiting/2026", records, &rule);

    assert_eq!(outcome.accepted.len(), 2);
    assert_eq!(outcome.warnings, vec!["recruiting/2026: 1 record(s) with unexpected 'grade' value"]);
}

#[test]
fn test_payload_non_objects_are_rejected() {
    let rule = ValidationRule::new().require(["team"]);
    let outcome = ValidationEngine::validate_payload(
        "standings",
        &json!({"standings": [{"team": "STL"}, "garbage", 42]}),
        &rule,
    );
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.rejected_count, 2);
}
