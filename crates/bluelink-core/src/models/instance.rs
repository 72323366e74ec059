use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::link::LinkState;
use crate::models::resource::ResourceState;
use crate::models::status::InstanceStatus;

/// Persisted state of a deployed blueprint instance.
///
/// Maps are ordered so that anything iterating an instance (drift checks,
/// reconciliation previews) does so deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    pub instance_id: String,
    pub instance_name: String,
    #[serde(default)]
    pub status: InstanceStatus,
    /// Resource ID → resource state.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
    /// Logical resource name → resource ID.
    #[serde(default)]
    pub resource_ids: BTreeMap<String, String>,
    /// Link name → link state.
    #[serde(default)]
    pub links: BTreeMap<String, LinkState>,
}

impl InstanceState {
    pub fn new(instance_id: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            instance_name: instance_name.into(),
            ..Self::default()
        }
    }

    /// Insert or replace a resource, keeping the name index in step.
    pub fn put_resource(&mut self, resource: ResourceState) {
        self.resource_ids
            .insert(resource.name.clone(), resource.resource_id.clone());
        self.resources.insert(resource.resource_id.clone(), resource);
    }

    pub fn put_link(&mut self, link: LinkState) {
        self.links.insert(link.name.clone(), link);
    }

    pub fn resource_by_name(&self, name: &str) -> Option<&ResourceState> {
        self.resource_ids
            .get(name)
            .and_then(|id| self.resources.get(id))
    }
}
