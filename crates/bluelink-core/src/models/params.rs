use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::MappingNode;

/// Caller-supplied parameters forwarded to provider plugins as-is.
///
/// The drift engine never reads these; they exist so providers can resolve
/// credentials, regions and the like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintParams {
    /// Provider namespace (e.g. "aws") → provider config values.
    #[serde(default)]
    pub provider_config: BTreeMap<String, BTreeMap<String, MappingNode>>,
    #[serde(default)]
    pub context_variables: BTreeMap<String, MappingNode>,
    #[serde(default)]
    pub blueprint_variables: BTreeMap<String, MappingNode>,
}

impl BlueprintParams {
    pub fn provider_config_for(&self, namespace: &str) -> Option<&BTreeMap<String, MappingNode>> {
        self.provider_config.get(namespace)
    }
}
