//! Link overlay: places link-managed values onto a resource spec before it
//! is compared with external state.
//!
//! A link's deployment may legitimately write fields of the resources it
//! connects (a function's environment variables, a table's stream config).
//! Those writes never show up in the resource's own persisted spec, so
//! without this overlay they would be reported as drift on every check.

use std::collections::BTreeMap;

use bluelink_core::models::LinkState;
use bluelink_core::{FieldPath, MappingNode, PathSegment};

use crate::error::OverlayError;

/// How far past the end of a list a mapping may write. Slots in between
/// are padded with empty values.
const MAX_INDEX_GAP: usize = 1024;

/// Return a copy of `spec` with every link mapping targeting
/// `resource_name` applied. `spec` itself is left untouched.
///
/// Links are applied in link-name order and mappings in key order. A mapping
/// whose value is absent from the link data is skipped. Missing objects and
/// list slots along a target path are created.
pub fn apply_link_overlays(
    resource_name: &str,
    spec: &MappingNode,
    links: &[LinkState],
) -> Result<MappingNode, OverlayError> {
    let mut ordered: Vec<&LinkState> = links.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut overlaid = spec.clone();
    for link in ordered {
        for mapping in link.mappings_for(resource_name) {
            let invalid = |source| OverlayError::InvalidPath {
                link: link.name.clone(),
                source,
            };
            let (field_path, data_path) = mapping.map_err(invalid)?;
            let target = FieldPath::parse(field_path)
                .map_err(invalid)?
                .strip_field_prefix("spec");
            let source = FieldPath::parse(data_path).map_err(invalid)?;

            let Some(value) = lookup(&link.data, source.segments()).filter(|v| !v.is_empty())
            else {
                tracing::debug!(
                    link = %link.name,
                    data_path = %source,
                    "link data has no value for mapping, skipping"
                );
                continue;
            };

            write_at(&mut overlaid, target.segments(), value.clone()).map_err(|err| match err {
                WriteError::Conflict { found, expected } => OverlayError::Conflict {
                    link: link.name.clone(),
                    path: target.to_string(),
                    found,
                    expected,
                },
                WriteError::IndexOutOfRange { index, len } => OverlayError::IndexOutOfRange {
                    link: link.name.clone(),
                    path: target.to_string(),
                    index,
                    len,
                },
            })?;
        }
    }

    Ok(overlaid)
}

fn lookup<'a>(node: &'a MappingNode, segments: &[PathSegment]) -> Option<&'a MappingNode> {
    segments.iter().try_fold(node, |current, segment| match (segment, current) {
        (PathSegment::Field(name), MappingNode::Fields(fields)) => fields.get(name),
        (PathSegment::Index(index), MappingNode::Items(items)) => items.get(*index),
        _ => None,
    })
}

enum WriteError {
    Conflict {
        found: &'static str,
        expected: &'static str,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
}

/// Write `value` at `segments`, synthesising empty intermediates.
/// Fails when a non-empty node of the wrong kind is in the way, or when an
/// index lies more than [`MAX_INDEX_GAP`] past the end of its list.
fn write_at(
    root: &mut MappingNode,
    segments: &[PathSegment],
    value: MappingNode,
) -> Result<(), WriteError> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            PathSegment::Field(name) => {
                if node.is_empty() {
                    *node = MappingNode::Fields(BTreeMap::new());
                }
                match node {
                    MappingNode::Fields(fields) => fields.entry(name.clone()).or_default(),
                    other => {
                        return Err(WriteError::Conflict {
                            found: other.kind(),
                            expected: "object",
                        });
                    }
                }
            }
            PathSegment::Index(index) => {
                if node.is_empty() {
                    *node = MappingNode::Items(Vec::new());
                }
                match node {
                    MappingNode::Items(items) => {
                        if index.saturating_sub(items.len()) > MAX_INDEX_GAP {
                            return Err(WriteError::IndexOutOfRange {
                                index: *index,
                                len: items.len(),
                            });
                        }
                        if items.len() <= *index {
                            items.resize(index + 1, MappingNode::Empty);
                        }
                        &mut items[*index]
                    }
                    other => {
                        return Err(WriteError::Conflict {
                            found: other.kind(),
                            expected: "list",
                        });
                    }
                }
            }
        };
    }
    *node = value;
    Ok(())
}
