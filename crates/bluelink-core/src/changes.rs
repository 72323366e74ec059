use serde::{Deserialize, Serialize};

use crate::node::MappingNode;

/// Before/after values for one field path.
///
/// New fields carry only `new_value`; modified fields carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_value: Option<MappingNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<MappingNode>,
}

/// Categorised result of comparing two value trees.
///
/// Every classified path appears in exactly one of the four lists, and
/// each list is sorted by field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDriftChanges {
    #[serde(default)]
    pub modified_fields: Vec<FieldChange>,
    #[serde(default)]
    pub new_fields: Vec<FieldChange>,
    #[serde(default)]
    pub removed_fields: Vec<String>,
    #[serde(default)]
    pub unchanged_fields: Vec<String>,
}

impl ResourceDriftChanges {
    /// True when no path was classified at all.
    pub fn is_empty(&self) -> bool {
        self.modified_fields.is_empty()
            && self.new_fields.is_empty()
            && self.removed_fields.is_empty()
            && self.unchanged_fields.is_empty()
    }

    pub fn has_new_or_modified(&self) -> bool {
        !self.modified_fields.is_empty() || !self.new_fields.is_empty()
    }

    /// True when anything other than unchanged fields was found.
    pub fn has_changes(&self) -> bool {
        self.has_new_or_modified() || !self.removed_fields.is_empty()
    }

    /// Every classified path, across all four categories.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> {
        self.modified_fields
            .iter()
            .chain(&self.new_fields)
            .map(|c| c.field_path.as_str())
            .chain(self.removed_fields.iter().map(String::as_str))
            .chain(self.unchanged_fields.iter().map(String::as_str))
    }
}
