//! Smoke run of drift checking and reconciliation against a local state file.
//!
//! Seeds a small instance, answers provider calls from a static table and
//! prints what the checker and reconciler make of it.
//!
//! Usage:
//!   BLUELINK_DRIFT_CONFIG=./drift.json \
//!   RUST_LOG=bluelink_drift=debug \
//!   cargo run -p bluelink-drift --example drift_smoke

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use bluelink_core::MappingNode;
use bluelink_core::models::{
    BlueprintParams, InstanceState, LinkState, PreciseResourceStatus, ResourceState,
};
use bluelink_drift::{
    DriftChecker, DriftConfig, ExternalStateInput, ProviderError, ProviderRegistry, Reconciler,
    ResourceProvider, load_config,
};
use bluelink_state::{BoxFuture, FileStateContainer, StateContainer};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Answers with fixed external state keyed by resource name.
struct StaticProvider {
    external: BTreeMap<&'static str, MappingNode>,
}

impl ResourceProvider for StaticProvider {
    fn get_external_state<'a>(
        &'a self,
        input: ExternalStateInput<'a>,
    ) -> BoxFuture<'a, Result<Option<MappingNode>, ProviderError>> {
        Box::pin(async move { Ok(self.external.get(input.resource_name).cloned()) })
    }
}

fn resource(
    id: &str,
    name: &str,
    status: PreciseResourceStatus,
    spec: serde_json::Value,
) -> ResourceState {
    ResourceState {
        resource_id: id.to_string(),
        name: name.to_string(),
        resource_type: "aws/lambda/function".to_string(),
        instance_id: "inst-smoke".to_string(),
        status: status.coarse(),
        precise_status: status,
        spec_data: MappingNode::from(spec),
        drifted: false,
        last_drift_detected_timestamp: None,
        last_deployed_timestamp: None,
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("BLUELINK_DRIFT_CONFIG") {
        Ok(path) => load_config(&PathBuf::from(path))?,
        Err(_) => DriftConfig::default(),
    };
    let state_path = match &config.state_path {
        Some(path) => path.clone(),
        None => std::env::temp_dir().join("bluelink-drift-smoke.json"),
    };

    println!("State file:      {}", state_path.display());
    println!("Removed fields:  {:?}", config.removed_fields_policy);
    println!();

    let state = Arc::new(FileStateContainer::open(&state_path)?);

    let mut instance = InstanceState::new("inst-smoke", "orders-stack");
    instance.put_resource(resource(
        "res-fn",
        "ordersFunction",
        PreciseResourceStatus::Created,
        json!({"handler": "index.handler", "memorySize": 256}),
    ));
    instance.put_resource(resource(
        "res-worker",
        "ordersWorker",
        PreciseResourceStatus::UpdateInterrupted,
        json!({"handler": "worker.handler", "timeout": 30}),
    ));
    instance.put_link(LinkState {
        link_id: "link-1".into(),
        name: "ordersFunction::ordersTable".into(),
        instance_id: "inst-smoke".into(),
        data: MappingNode::from(json!({"ordersFunction": {"tableEnv": "ORDERS"}})),
        resource_data_mappings: BTreeMap::from([(
            "ordersFunction::spec.environment.variables.TABLE".to_string(),
            "ordersFunction.tableEnv".to_string(),
        )]),
    });
    state.save_instance(&instance).await?;

    let provider = StaticProvider {
        external: BTreeMap::from([
            (
                "ordersFunction",
                MappingNode::from(json!({
                    "handler": "index.handler",
                    "memorySize": 512,
                    "environment": {"variables": {"TABLE": "ORDERS"}}
                })),
            ),
            (
                "ordersWorker",
                MappingNode::from(json!({"handler": "worker.handler", "timeout": 60})),
            ),
        ]),
    };
    let providers =
        Arc::new(ProviderRegistry::new().with_provider("aws/lambda/function", Arc::new(provider)));

    let checker = DriftChecker::new(state.clone(), providers.clone(), &config);
    let drifted = checker
        .check_drift("inst-smoke", &BlueprintParams::default())
        .await?;

    println!("Drift check:");
    for (resource_id, drift) in &drifted {
        println!("  {resource_id} ({})", drift.resource_name);
        if let Some(difference) = &drift.difference {
            for change in &difference.modified_fields {
                println!(
                    "    ~ {}: {} -> {}",
                    change.field_path,
                    change.prev_value.clone().unwrap_or_default(),
                    change.new_value.clone().unwrap_or_default()
                );
            }
            for change in &difference.new_fields {
                println!(
                    "    + {}: {}",
                    change.field_path,
                    change.new_value.clone().unwrap_or_default()
                );
            }
            for path in &difference.removed_fields {
                println!("    - {path}");
            }
        }
    }
    if drifted.is_empty() {
        println!("  no drift");
    }
    println!();

    let reconciler = Reconciler::new(state.clone(), providers, &config);
    let results = reconciler
        .reconcile_instance("inst-smoke", &BlueprintParams::default())
        .await?;

    println!("Reconciliation preview:");
    for result in &results {
        println!(
            "  {} {} -> {} ({:?})",
            result.resource_name,
            result.old_status,
            result.new_status,
            result.recommended_action()
        );
    }

    Ok(())
}
