use bluelink_core::{MappingNode, ScalarValue};
use serde_json::json;

#[test]
fn json_numbers_keep_their_type() {
    let node = MappingNode::from(json!({"count": 3, "ratio": 0.5, "whole": 2.0}));

    assert_eq!(node.field("count").and_then(MappingNode::as_scalar), Some(&ScalarValue::Int(3)));
    assert_eq!(node.field("ratio").and_then(MappingNode::as_scalar), Some(&ScalarValue::Float(0.5)));
    assert_eq!(node.field("whole").and_then(MappingNode::as_scalar), Some(&ScalarValue::Float(2.0)));
}

#[test]
fn json_null_is_empty() {
    let node = MappingNode::from(json!({"description": null}));
    assert_eq!(node.field("description"), Some(&MappingNode::Empty));
    assert!(MappingNode::from(json!(null)).is_empty());
}

#[test]
fn serde_shape_is_plain_json() {
    let node = MappingNode::fields([
        ("tableName", MappingNode::from("ORDERS")),
        ("replicas", MappingNode::items([MappingNode::from("us-west-2")])),
        ("ttl", MappingNode::from(true)),
    ]);

    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(
        value,
        json!({"tableName": "ORDERS", "replicas": ["us-west-2"], "ttl": true})
    );

    let parsed: MappingNode = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, node);
}

#[test]
fn deserialized_scalars_match_converted_ones() {
    let raw = r#"{"a": 1, "b": 1.5, "c": "x", "d": false, "e": null, "f": [1, "1"]}"#;
    let parsed: MappingNode = serde_json::from_str(raw).unwrap();
    let converted = MappingNode::from(serde_json::from_str::<serde_json::Value>(raw).unwrap());
    assert_eq!(parsed, converted);
}

#[test]
fn kinds_are_named() {
    assert_eq!(MappingNode::Empty.kind(), "empty");
    assert_eq!(MappingNode::from(1_i64).kind(), "scalar");
    assert_eq!(MappingNode::Items(vec![]).kind(), "list");
    assert_eq!(MappingNode::from(json!({})).kind(), "object");
}

#[test]
fn non_finite_floats_do_not_serialize() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let node = MappingNode::fields([("ratio", MappingNode::from(value))]);
        assert!(serde_json::to_string(&node).is_err());
    }

    let finite = MappingNode::fields([("ratio", MappingNode::from(0.25))]);
    assert_eq!(serde_json::to_string(&finite).unwrap(), r#"{"ratio":0.25}"#);
}
