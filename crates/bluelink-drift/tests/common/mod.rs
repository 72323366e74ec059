#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bluelink_core::MappingNode;
use bluelink_core::models::{
    InstanceState, LinkState, PreciseResourceStatus, ResourceState, ResourceStatus,
};
use bluelink_drift::{ExternalStateInput, FixedClock, ProviderError, ProviderRegistry, ResourceProvider};
use bluelink_state::{BoxFuture, MemoryStateContainer, StateSnapshot};
use serde_json::Value;

pub const INSTANCE_ID: &str = "inst-1";
pub const INSTANCE_NAME: &str = "orders-stack";

/// What the fake provider answers for one resource ID.
#[derive(Clone)]
pub enum Outcome {
    Found(MappingNode),
    NotFound,
    Fail(String),
    Hang,
}

/// Table-driven provider: answers are looked up by resource ID.
#[derive(Default)]
pub struct FakeProvider {
    outcomes: HashMap<String, Outcome>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Outcome)>,
    {
        Self {
            outcomes: outcomes
                .into_iter()
                .map(|(id, outcome)| (id.to_string(), outcome))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for FakeProvider {
    fn get_external_state<'a>(
        &'a self,
        input: ExternalStateInput<'a>,
    ) -> BoxFuture<'a, Result<Option<MappingNode>, ProviderError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcomes.get(input.resource_id) {
                Some(Outcome::Found(node)) => Ok(Some(node.clone())),
                Some(Outcome::NotFound) | None => Ok(None),
                Some(Outcome::Fail(msg)) => Err(ProviderError::Plugin(msg.clone())),
                Some(Outcome::Hang) => std::future::pending().await,
            }
        })
    }
}

pub fn found(value: Value) -> Outcome {
    Outcome::Found(MappingNode::from(value))
}

pub fn registry(resource_type: &str, provider: Arc<FakeProvider>) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new().with_provider(resource_type, provider))
}

pub fn resource(id: &str, name: &str, resource_type: &str, spec: Value) -> ResourceState {
    ResourceState {
        resource_id: id.to_string(),
        name: name.to_string(),
        resource_type: resource_type.to_string(),
        instance_id: INSTANCE_ID.to_string(),
        status: ResourceStatus::Created,
        precise_status: PreciseResourceStatus::Created,
        spec_data: MappingNode::from(spec),
        drifted: false,
        last_drift_detected_timestamp: None,
        last_deployed_timestamp: None,
    }
}

pub fn link(name: &str, data: Value, mappings: &[(&str, &str)]) -> LinkState {
    LinkState {
        link_id: format!("link-{name}"),
        name: name.to_string(),
        instance_id: INSTANCE_ID.to_string(),
        data: MappingNode::from(data),
        resource_data_mappings: mappings
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

pub fn store_with(resources: Vec<ResourceState>, links: Vec<LinkState>) -> Arc<MemoryStateContainer> {
    let mut instance = InstanceState::new(INSTANCE_ID, INSTANCE_NAME);
    for r in resources {
        instance.put_resource(r);
    }
    for l in links {
        instance.put_link(l);
    }
    let mut snapshot = StateSnapshot::default();
    snapshot.put_instance(instance);
    Arc::new(MemoryStateContainer::from_snapshot(snapshot))
}

pub fn check_time() -> jiff::Timestamp {
    "2026-01-15T10:00:00Z".parse().unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(check_time()))
}
