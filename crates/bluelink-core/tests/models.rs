use bluelink_core::MappingNode;
use bluelink_core::models::link::split_qualified_path;
use bluelink_core::models::{
    DriftRecord, InstanceState, LinkState, PreciseResourceStatus, ResourceDriftState,
    ResourceStatus,
};

#[test]
fn drift_record_distinguishes_never_checked_from_clean() {
    assert_eq!(DriftRecord::from(None), DriftRecord::NeverChecked);
    assert_eq!(DriftRecord::from(Some(ResourceDriftState::cleared())), DriftRecord::Clean);

    let drifted = ResourceDriftState {
        resource_id: "res-1".into(),
        ..ResourceDriftState::default()
    };
    assert!(DriftRecord::from(Some(drifted)).is_drifted());
}

#[test]
fn interrupted_statuses_resolve_both_ways() {
    use PreciseResourceStatus::*;

    assert_eq!(CreateInterrupted.resolved_when_present(), Some(Created));
    assert_eq!(CreateInterrupted.resolved_when_absent(), Some(CreateFailed));
    assert_eq!(UpdateInterrupted.resolved_when_present(), Some(Updated));
    assert_eq!(UpdateInterrupted.resolved_when_absent(), Some(UpdateFailed));
    assert_eq!(DestroyInterrupted.resolved_when_present(), Some(DestroyFailed));
    assert_eq!(DestroyInterrupted.resolved_when_absent(), Some(Destroyed));

    assert!(!Created.is_interrupted());
    assert_eq!(Created.resolved_when_present(), None);
}

#[test]
fn status_displays_as_persisted() {
    assert_eq!(PreciseResourceStatus::CreateInterrupted.to_string(), "create_interrupted");
}

#[test]
fn link_mappings_are_filtered_by_resource() {
    let link = LinkState {
        link_id: "l-1".into(),
        name: "saveOrderFunction::ordersTable".into(),
        instance_id: "inst-1".into(),
        data: MappingNode::Empty,
        resource_data_mappings: [
            ("saveOrderFunction::spec.handler".to_string(), "fn.handler".to_string()),
            ("ordersTable::spec.streamSpec".to_string(), "table.stream".to_string()),
        ]
        .into_iter()
        .collect(),
    };

    let mappings: Vec<_> = link
        .mappings_for("saveOrderFunction")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(mappings, vec![("spec.handler", "fn.handler")]);
}

#[test]
fn qualified_path_needs_both_halves() {
    assert_eq!(split_qualified_path("fn::spec.a").unwrap(), ("fn", "spec.a"));
    assert!(split_qualified_path("fn.spec.a").is_err());
    assert!(split_qualified_path("::spec.a").is_err());
    assert!(split_qualified_path("fn::").is_err());
}

#[test]
fn instance_indexes_resources_by_name() {
    let mut instance = InstanceState::new("inst-1", "orders");
    instance.put_resource(bluelink_core::models::ResourceState {
        resource_id: "res-1".into(),
        name: "ordersTable".into(),
        resource_type: "aws/dynamodb/table".into(),
        instance_id: "inst-1".into(),
        status: ResourceStatus::Created,
        precise_status: PreciseResourceStatus::Created,
        spec_data: MappingNode::Empty,
        drifted: false,
        last_drift_detected_timestamp: None,
        last_deployed_timestamp: None,
    });

    assert_eq!(
        instance.resource_by_name("ordersTable").map(|r| r.resource_id.as_str()),
        Some("res-1")
    );
    assert!(instance.resource_by_name("missing").is_none());
}

#[test]
fn precise_statuses_collapse_to_coarse_ones() {
    use PreciseResourceStatus::*;

    assert_eq!(Created.coarse(), ResourceStatus::Created);
    assert_eq!(UpdateRollingBack.coarse(), ResourceStatus::RollingBack);
    assert_eq!(CreateRollbackFailed.coarse(), ResourceStatus::RollbackFailed);
    assert_eq!(DestroyRollbackComplete.coarse(), ResourceStatus::RollbackComplete);
    assert_eq!(DestroyInterrupted.coarse(), ResourceStatus::DestroyInterrupted);
}

#[test]
fn setting_precise_status_keeps_coarse_in_step() {
    let mut resource: bluelink_core::models::ResourceState = serde_json::from_value(
        serde_json::json!({
            "resource_id": "res-1",
            "name": "ordersTable",
            "type": "aws/dynamodb/table",
            "instance_id": "inst-1"
        }),
    )
    .unwrap();
    assert_eq!(resource.status, ResourceStatus::Unknown);
    assert_eq!(resource.precise_status, PreciseResourceStatus::Unknown);

    resource.set_status(PreciseResourceStatus::UpdateRollbackComplete);
    assert_eq!(resource.precise_status, PreciseResourceStatus::UpdateRollbackComplete);
    assert_eq!(resource.status, ResourceStatus::RollbackComplete);
}

#[test]
fn instance_status_defaults_when_missing() {
    let instance: InstanceState =
        serde_json::from_value(serde_json::json!({"instance_id": "i", "instance_name": "n"}))
            .unwrap();
    assert_eq!(instance.status, bluelink_core::models::InstanceStatus::Unknown);
}
