use std::collections::HashSet;

use bluelink_core::{FieldChange, MappingNode};
use bluelink_drift::changes::diff;
use serde_json::json;

fn node(value: serde_json::Value) -> MappingNode {
    MappingNode::from(value)
}

#[test]
fn identical_trees_are_all_unchanged() {
    let spec = node(json!({"tableName": "ORDERS_TABLE", "region": "us-east-1"}));

    let changes = diff(&spec, &spec.clone());
    assert!(!changes.has_changes());
    assert_eq!(changes.unchanged_fields, vec!["region", "tableName"]);
}

#[test]
fn modified_scalars_carry_before_and_after() {
    let before = node(json!({"tableName": "ORDERS_TABLE", "region": "us-east-1"}));
    let after = node(json!({"tableName": "ORDERS_TABLE_2", "region": "us-west-1"}));

    let changes = diff(&before, &after);
    assert_eq!(
        changes.modified_fields,
        vec![
            FieldChange {
                field_path: "region".into(),
                prev_value: Some("us-east-1".into()),
                new_value: Some("us-west-1".into()),
            },
            FieldChange {
                field_path: "tableName".into(),
                prev_value: Some("ORDERS_TABLE".into()),
                new_value: Some("ORDERS_TABLE_2".into()),
            },
        ]
    );
    assert!(changes.new_fields.is_empty());
    assert!(changes.removed_fields.is_empty());
    assert!(changes.unchanged_fields.is_empty());
}

#[test]
fn shorter_list_yields_modified_and_removed_indices() {
    let before = node(json!({
        "itemConfig": {
            "name": "orders",
            "endpoints": ["https://a/1", "https://a/2"],
        }
    }));
    let after = node(json!({
        "itemConfig": {
            "name": "orders",
            "endpoints": ["https://b/1"],
        }
    }));

    let changes = diff(&before, &after);
    assert_eq!(changes.modified_fields.len(), 1);
    assert_eq!(changes.modified_fields[0].field_path, "itemConfig.endpoints[0]");
    assert_eq!(changes.modified_fields[0].new_value, Some("https://b/1".into()));
    assert_eq!(changes.removed_fields, vec!["itemConfig.endpoints[1]"]);
    assert_eq!(changes.unchanged_fields, vec!["itemConfig.name"]);
}

#[test]
fn longer_list_yields_new_indices() {
    let before = node(json!({"ports": [80]}));
    let after = node(json!({"ports": [80, 443]}));

    let changes = diff(&before, &after);
    assert_eq!(changes.unchanged_fields, vec!["ports[0]"]);
    assert_eq!(changes.new_fields.len(), 1);
    assert_eq!(changes.new_fields[0].field_path, "ports[1]");
    assert_eq!(changes.new_fields[0].prev_value, None);
    assert_eq!(changes.new_fields[0].new_value, Some(MappingNode::from(443_i64)));
}

#[test]
fn list_order_matters() {
    let before = node(json!({"zones": ["a", "b"]}));
    let after = node(json!({"zones": ["b", "a"]}));

    let changes = diff(&before, &after);
    let paths: Vec<_> = changes.modified_fields.iter().map(|c| c.field_path.as_str()).collect();
    assert_eq!(paths, vec!["zones[0]", "zones[1]"]);
}

#[test]
fn scalar_type_change_is_modified() {
    let before = node(json!({"count": "1", "ratio": 1, "enabled": "true"}));
    let after = node(json!({"count": 1, "ratio": 1.0, "enabled": true}));

    let changes = diff(&before, &after);
    assert_eq!(changes.modified_fields.len(), 3);
    assert!(changes.unchanged_fields.is_empty());
}

#[test]
fn container_kind_change_is_one_modification() {
    let before = node(json!({"target": {"arn": "arn:1"}}));
    let after = node(json!({"target": ["arn:1"]}));

    let changes = diff(&before, &after);
    assert_eq!(changes.modified_fields.len(), 1);
    assert_eq!(changes.modified_fields[0].field_path, "target");
    assert_eq!(changes.modified_fields[0].prev_value, Some(before.field("target").unwrap().clone()));
    assert!(changes.new_fields.is_empty());
    assert!(changes.removed_fields.is_empty());
}

#[test]
fn one_sided_subtree_is_reported_once() {
    let before = node(json!({"name": "fn"}));
    let after = node(json!({"name": "fn", "vpc": {"subnets": ["s-1", "s-2"], "sg": "sg-1"}}));

    let changes = diff(&before, &after);
    assert_eq!(changes.new_fields.len(), 1);
    assert_eq!(changes.new_fields[0].field_path, "vpc");
    assert_eq!(changes.new_fields[0].new_value, after.field("vpc").cloned());

    let reversed = diff(&after, &before);
    assert_eq!(reversed.removed_fields, vec!["vpc"]);
}

#[test]
fn null_fields_count_as_absent() {
    let before = node(json!({"name": "fn", "description": null}));
    let after = node(json!({"name": "fn"}));

    let changes = diff(&before, &after);
    assert_eq!(changes.unchanged_fields, vec!["name"]);
    assert!(!changes.has_changes());
}

#[test]
fn empty_containers_on_both_sides_are_unchanged() {
    let before = node(json!({"tags": {}, "layers": []}));
    let after = node(json!({"tags": {}, "layers": []}));

    let changes = diff(&before, &after);
    assert_eq!(changes.unchanged_fields, vec!["layers", "tags"]);
}

#[test]
fn field_names_needing_quotes_render_in_brackets() {
    let before = node(json!({"labels": {"app.kubernetes.io/name": "orders"}}));
    let after = node(json!({"labels": {"app.kubernetes.io/name": "billing"}}));

    let changes = diff(&before, &after);
    assert_eq!(
        changes.modified_fields[0].field_path,
        r#"labels["app.kubernetes.io/name"]"#
    );
}

#[test]
fn output_is_sorted_by_path() {
    let before = node(json!({"zeta": 1, "alpha": 1, "mid": {"b": 1, "a": 1}}));
    let after = node(json!({"zeta": 2, "alpha": 2, "mid": {"b": 2, "a": 2}}));

    let changes = diff(&before, &after);
    let paths: Vec<_> = changes.modified_fields.iter().map(|c| c.field_path.as_str()).collect();
    assert_eq!(paths, vec!["alpha", "mid.a", "mid.b", "zeta"]);
}

fn sample_pairs() -> Vec<(MappingNode, MappingNode)> {
    vec![
        (
            node(json!({"a": 1, "b": {"c": [1, 2, 3], "d": "x"}, "e": true})),
            node(json!({"a": 2, "b": {"c": [1, 5], "f": "y"}, "g": null})),
        ),
        (
            node(json!({"list": [{"k": 1}, {"k": 2}], "s": "v"})),
            node(json!({"list": [{"k": 1, "j": 0}], "s": ["v"]})),
        ),
        (node(json!({})), node(json!({"only": {"after": [1]}}))),
    ]
}

#[test]
fn every_path_lands_in_exactly_one_category() {
    for (a, b) in sample_pairs() {
        let changes = diff(&a, &b);
        let paths: Vec<&str> = changes.all_paths().collect();
        let unique: HashSet<&str> = paths.iter().copied().collect();
        assert_eq!(paths.len(), unique.len(), "duplicate path in {changes:?}");
    }

    let (a, b) = sample_pairs().remove(0);
    let changes = diff(&a, &b);
    let mut paths: Vec<&str> = changes.all_paths().collect();
    paths.sort_unstable();
    assert_eq!(
        paths,
        vec!["a", "b.c[0]", "b.c[1]", "b.c[2]", "b.d", "b.f", "e"]
    );
}

#[test]
fn swapping_inputs_swaps_new_and_removed() {
    for (a, b) in sample_pairs() {
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);

        let forward_new: Vec<&str> = forward.new_fields.iter().map(|c| c.field_path.as_str()).collect();
        assert_eq!(forward_new, backward.removed_fields);
        let backward_new: Vec<&str> = backward.new_fields.iter().map(|c| c.field_path.as_str()).collect();
        assert_eq!(backward_new, forward.removed_fields);

        assert_eq!(forward.unchanged_fields, backward.unchanged_fields);

        assert_eq!(forward.modified_fields.len(), backward.modified_fields.len());
        for (f, r) in forward.modified_fields.iter().zip(&backward.modified_fields) {
            assert_eq!(f.field_path, r.field_path);
            assert_eq!(f.prev_value, r.new_value);
            assert_eq!(f.new_value, r.prev_value);
        }
    }
}

#[test]
fn empty_root_compares_field_by_field() {
    let spec = node(json!({"tableName": "ORDERS", "region": "us-east-1"}));

    let changes = diff(&spec, &MappingNode::Empty);
    assert_eq!(changes.removed_fields, vec!["region", "tableName"]);

    let changes = diff(&MappingNode::Empty, &spec);
    let paths: Vec<_> = changes.new_fields.iter().map(|c| c.field_path.as_str()).collect();
    assert_eq!(paths, vec!["region", "tableName"]);
}
