use serde::{Deserialize, Serialize};

use crate::changes::ResourceDriftChanges;
use crate::node::MappingNode;

/// Result of the last drift check that found drift for a resource.
///
/// The all-default value is the "checked, clean" record: a check ran and
/// found nothing. It is persisted in place of a populated record so stale
/// drift from an earlier check never survives a clean one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDriftState {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub resource_type: String,
    /// External state observed at check time.
    #[serde(default)]
    pub spec_data: MappingNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<ResourceDriftChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<jiff::Timestamp>,
}

impl ResourceDriftState {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tri-state view over a stored drift record.
#[derive(Debug, Clone, PartialEq)]
pub enum DriftRecord {
    NeverChecked,
    Clean,
    Drifted(ResourceDriftState),
}

impl From<Option<ResourceDriftState>> for DriftRecord {
    fn from(stored: Option<ResourceDriftState>) -> Self {
        match stored {
            None => Self::NeverChecked,
            Some(state) if state.is_empty() => Self::Clean,
            Some(state) => Self::Drifted(state),
        }
    }
}

impl DriftRecord {
    pub fn is_drifted(&self) -> bool {
        matches!(self, Self::Drifted(_))
    }
}
