//! Tests for partition module

use super::*;
use crate::error::Error;
use crate::template;
use serde_json::json;

// ============================================================================
// PartitionValue Tests
// ============================================================================

#[test]
fn test_partition_value_with_value() {
    let pv = PartitionValue::new("id1")
        .with_value("key1", "value1")
        .with_value("key2", 42);

    assert_eq!(pv.id, "id1");
    assert_eq!(pv.get("key1"), Some(&json!("value1")));
    assert_eq!(pv.get("key2"), Some(&json!(42)));
    assert_eq!(pv.get("missing"), None);
}

#[test]
fn test_partition_value_context_renders_path() {
    let pv = PartitionValue::new("9").with_value("broadcast_id", 9);
    let path = template::render(
        "broadcasts/{{ partition.broadcast_id }}/metrics/links",
        &pv.context(),
    )
    .unwrap();
    assert_eq!(path, "broadcasts/9/metrics/links");
}

// ============================================================================
// ParentRouter Tests
// ============================================================================

#[test]
fn test_parent_router_numeric_key() {
    let router = ParentRouter::new("broadcast_metrics", "id", "broadcast_id");

    let partition = router.partition_for(&json!({"id": 123, "name": "Welcome"})).unwrap();
    assert_eq!(partition.id, "123");
    assert_eq!(partition.get("broadcast_id"), Some(&json!(123)));
}

#[test]
fn test_parent_router_string_key() {
    let router = ParentRouter::new("campaign_actions", "id", "campaign_id");

    let partition = router.partition_for(&json!({"id": "c-1"})).unwrap();
    assert_eq!(partition.id, "c-1");
    assert_eq!(router.partition_field(), "campaign_id");
}

#[test]
fn test_parent_router_nested_key() {
    let router = ParentRouter::new("child", "data.id", "nested_id");

    let partition = router.partition_for(&json!({"data": {"id": "a"}})).unwrap();
    assert_eq!(partition.id, "a");
}

#[test]
fn test_parent_router_missing_key_fails() {
    let router = ParentRouter::new("broadcast_actions", "id", "broadcast_id");

    for record in [json!({"name": "no id"}), json!({"id": null}), json!({"id": ""})] {
        let err = router.partition_for(&record).unwrap_err();
        assert!(
            matches!(err, Error::Partition { ref stream, .. } if stream == "broadcast_actions"),
            "unexpected error for {record}: {err}"
        );
    }
}

#[test]
fn test_parent_router_non_scalar_key_fails() {
    let router = ParentRouter::new("campaign_metrics", "id", "campaign_id");

    let err = router.partition_for(&json!({"id": {"nested": 1}})).unwrap_err();
    assert!(err.to_string().contains("not a string or number"));
}

#[test]
fn test_parent_router_from_link() {
    let link = ParentLink {
        stream: "campaigns",
        parent_key: "id",
        partition_field: "campaign_id",
    };
    let router = ParentRouter::from_link("campaign_metrics", &link);

    let partition = router.partition_for(&json!({"id": 5})).unwrap();
    assert_eq!(partition.get("campaign_id"), Some(&json!(5)));
}

#[test]
fn test_parent_router_encodes_string_key_as_one_segment() {
    let router = ParentRouter::new("broadcast_metrics", "id", "broadcast_id");

    let cases = [("7?x=1", "7%3Fx%3D1"), ("a/b", "a%2Fb"), ("x#y z", "x%23y%20z")];
    for (raw, encoded) in cases {
        let partition = router.partition_for(&json!({ "id": raw })).unwrap();
        assert_eq!(partition.id, raw);
        assert_eq!(partition.get("broadcast_id"), Some(&json!(encoded)));

        let path =
            template::render("broadcasts/{{ partition.broadcast_id }}/metrics", &partition.context())
                .unwrap();
        assert_eq!(path, format!("broadcasts/{encoded}/metrics"));
    }
}

#[test]
fn test_parent_router_rejects_dot_segments() {
    let router = ParentRouter::new("broadcast_metrics", "id", "broadcast_id");

    for id in [".", ".."] {
        let err = router.partition_for(&json!({ "id": id })).unwrap_err();
        assert!(
            matches!(err, Error::Partition { ref stream, .. } if stream == "broadcast_metrics"),
            "unexpected error for {id:?}: {err}"
        );
    }
}
