use bluelink_core::models::{InstanceState, LinkState, ResourceDriftState, ResourceState};
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::container::{BoxFuture, StateContainer};
use crate::error::StateError;
use crate::snapshot::StateSnapshot;

/// Process-local state container. Used by tests and short-lived tooling.
#[derive(Debug, Default)]
pub struct MemoryStateContainer {
    state: RwLock<StateSnapshot>,
}

impl MemoryStateContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.read().await.clone()
    }
}

impl StateContainer for MemoryStateContainer {
    fn get_instance<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<InstanceState, StateError>> {
        Box::pin(async move { self.state.read().await.instance(instance_id).cloned() })
    }

    fn save_instance<'a>(
        &'a self,
        instance: &'a InstanceState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move {
            self.state.write().await.put_instance(instance.clone());
            Ok(())
        })
    }

    fn get_resource<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<ResourceState, StateError>> {
        Box::pin(async move { self.state.read().await.resource(resource_id).cloned() })
    }

    fn save_resource<'a>(
        &'a self,
        resource: &'a ResourceState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move { self.state.write().await.put_resource(resource.clone()) })
    }

    fn get_links<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<LinkState>, StateError>> {
        Box::pin(async move { self.state.read().await.links(instance_id) })
    }

    fn get_drift<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ResourceDriftState>, StateError>> {
        Box::pin(async move { Ok(self.state.read().await.drift(resource_id)) })
    }

    fn save_drift_check<'a>(
        &'a self,
        resource_id: &'a str,
        drifted: bool,
        detected_at: Option<Timestamp>,
        drift: &'a ResourceDriftState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move {
            self.state
                .write()
                .await
                .record_drift_check(resource_id, drifted, detected_at, drift)
        })
    }
}
