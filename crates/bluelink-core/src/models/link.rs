use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::node::MappingNode;

/// Separator between the resource name and the field path in
/// `resource_data_mappings` keys.
pub const QUALIFIED_PATH_SEPARATOR: &str = "::";

/// Persisted state of a link between two resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkState {
    pub link_id: String,
    /// "resourceA::resourceB"
    pub name: String,
    pub instance_id: String,
    /// Values the link's last deployment wrote, addressed by the mappings.
    #[serde(default)]
    pub data: MappingNode,
    /// `"<resourceName>::spec.<path>"` → path into `data` holding the value
    /// the link is allowed to place at that resource field.
    #[serde(default)]
    pub resource_data_mappings: BTreeMap<String, String>,
}

impl LinkState {
    /// Mappings that target `resource_name`, as `(resource field path, link data path)`.
    pub fn mappings_for<'a>(
        &'a self,
        resource_name: &'a str,
    ) -> impl Iterator<Item = Result<(&'a str, &'a str), CoreError>> + 'a {
        self.resource_data_mappings
            .iter()
            .filter_map(move |(qualified, data_path)| match split_qualified_path(qualified) {
                Ok((name, field_path)) if name == resource_name => {
                    Some(Ok((field_path, data_path.as_str())))
                }
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            })
    }
}

/// Split `"ordersFunction::spec.handler"` into `("ordersFunction", "spec.handler")`.
pub fn split_qualified_path(qualified: &str) -> Result<(&str, &str), CoreError> {
    match qualified.split_once(QUALIFIED_PATH_SEPARATOR) {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => Ok((name, path)),
        _ => Err(CoreError::InvalidQualifiedPath(qualified.to_string())),
    }
}
