use std::collections::BTreeMap;

use bluelink_core::models::{InstanceState, LinkState, ResourceDriftState, ResourceState};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Everything a state container holds, in one serialisable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Instance ID → instance state.
    #[serde(default)]
    pub instances: BTreeMap<String, InstanceState>,
    /// Resource ID → last drift record.
    #[serde(default)]
    pub drift: BTreeMap<String, ResourceDriftState>,
}

impl StateSnapshot {
    pub fn instance(&self, instance_id: &str) -> Result<&InstanceState, StateError> {
        self.instances
            .get(instance_id)
            .ok_or_else(|| StateError::InstanceNotFound(instance_id.to_string()))
    }

    pub fn put_instance(&mut self, instance: InstanceState) {
        self.instances.insert(instance.instance_id.clone(), instance);
    }

    pub fn resource(&self, resource_id: &str) -> Result<&ResourceState, StateError> {
        self.instances
            .values()
            .find_map(|instance| instance.resources.get(resource_id))
            .ok_or_else(|| StateError::ResourceNotFound(resource_id.to_string()))
    }

    pub fn put_resource(&mut self, resource: ResourceState) -> Result<(), StateError> {
        let instance = self
            .instances
            .get_mut(&resource.instance_id)
            .ok_or_else(|| StateError::InstanceNotFound(resource.instance_id.clone()))?;
        instance.put_resource(resource);
        Ok(())
    }

    pub fn links(&self, instance_id: &str) -> Result<Vec<LinkState>, StateError> {
        Ok(self.instance(instance_id)?.links.values().cloned().collect())
    }

    pub fn drift(&self, resource_id: &str) -> Option<ResourceDriftState> {
        self.drift.get(resource_id).cloned()
    }

    fn resource_mut(&mut self, resource_id: &str) -> Result<&mut ResourceState, StateError> {
        self.instances
            .values_mut()
            .find_map(|instance| instance.resources.get_mut(resource_id))
            .ok_or_else(|| StateError::ResourceNotFound(resource_id.to_string()))
    }

    /// Apply a drift check outcome to the stored resource. Fields written
    /// by deployments are left as they are.
    pub fn record_drift_check(
        &mut self,
        resource_id: &str,
        drifted: bool,
        detected_at: Option<Timestamp>,
        drift: &ResourceDriftState,
    ) -> Result<(), StateError> {
        let resource = self.resource_mut(resource_id)?;
        resource.drifted = drifted;
        if let Some(at) = detected_at {
            resource.last_drift_detected_timestamp = Some(at);
        }
        self.drift.insert(resource_id.to_string(), drift.clone());
        Ok(())
    }
}
