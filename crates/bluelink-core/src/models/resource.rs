use serde::{Deserialize, Serialize};

use crate::models::status::{PreciseResourceStatus, ResourceStatus};
use crate::node::MappingNode;

/// Persisted state of one deployed resource.
///
/// `drifted` and `last_drift_detected_timestamp` are owned by the drift
/// checker; everything else is written by deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_id: String,
    /// Logical name of the resource in the blueprint, e.g. "ordersTable".
    pub name: String,
    /// Provider resource type, e.g. "aws/dynamodb/table".
    #[serde(rename = "type")]
    pub resource_type: String,
    pub instance_id: String,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub precise_status: PreciseResourceStatus,
    /// The spec as last written by the resource's own deployment.
    #[serde(default)]
    pub spec_data: MappingNode,
    #[serde(default)]
    pub drifted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_drift_detected_timestamp: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed_timestamp: Option<jiff::Timestamp>,
}

impl ResourceState {
    /// Set the precise status and the coarse status derived from it.
    pub fn set_status(&mut self, precise: PreciseResourceStatus) {
        self.precise_status = precise;
        self.status = precise.coarse();
    }
}
