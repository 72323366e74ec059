//! Structural diff between two value trees.
//!
//! The walk is purely structural: a segment stack tracks the current
//! position and path strings are only rendered when an entry is emitted.

use std::collections::{BTreeMap, BTreeSet};

use bluelink_core::{FieldChange, FieldPath, MappingNode, PathSegment, ResourceDriftChanges};

static EMPTY: MappingNode = MappingNode::Empty;

/// Compare `before` against `after` and classify every path.
///
/// - only in `after` → new field
/// - only in `before` → removed field
/// - in both and structurally equal → unchanged field
/// - in both and different → modified field
///
/// Objects recurse by field name and lists by index. A change of node kind
/// (object, list, scalar) is reported once, as a modification of the whole
/// sub-tree. A sub-tree that exists on one side only is reported once at
/// its top path. Each output list is sorted by field path.
pub fn diff(before: &MappingNode, after: &MappingNode) -> ResourceDriftChanges {
    // An empty root against an object compares field by field, so a
    // provider reporting nothing yields one removed entry per field.
    let no_fields = MappingNode::Fields(BTreeMap::new());
    let (before, after) = match (before, after) {
        (MappingNode::Empty, MappingNode::Fields(_)) => (&no_fields, after),
        (MappingNode::Fields(_), MappingNode::Empty) => (before, &no_fields),
        _ => (before, after),
    };

    let mut collector = Collector::default();
    let mut path = Vec::new();
    collector.walk(&mut path, before, after);
    collector.finish()
}

#[derive(Default)]
struct Collector {
    changes: ResourceDriftChanges,
}

impl Collector {
    fn walk(&mut self, path: &mut Vec<PathSegment>, before: &MappingNode, after: &MappingNode) {
        match (before, after) {
            (MappingNode::Empty, MappingNode::Empty) => {}
            (MappingNode::Empty, _) => self.push_new(path, after),
            (_, MappingNode::Empty) => self.push_removed(path),
            (MappingNode::Fields(b), MappingNode::Fields(a)) => {
                let emitted = self.count();
                let names: BTreeSet<&String> = b.keys().chain(a.keys()).collect();
                for name in names {
                    path.push(PathSegment::Field(name.clone()));
                    self.walk(
                        path,
                        b.get(name).unwrap_or(&EMPTY),
                        a.get(name).unwrap_or(&EMPTY),
                    );
                    path.pop();
                }
                self.settle_container(path, emitted);
            }
            (MappingNode::Items(b), MappingNode::Items(a)) => {
                let emitted = self.count();
                for index in 0..b.len().max(a.len()) {
                    path.push(PathSegment::Index(index));
                    self.walk(
                        path,
                        b.get(index).unwrap_or(&EMPTY),
                        a.get(index).unwrap_or(&EMPTY),
                    );
                    path.pop();
                }
                self.settle_container(path, emitted);
            }
            (MappingNode::Scalar(b), MappingNode::Scalar(a)) if b == a => {
                self.push_unchanged(path);
            }
            _ => self.push_modified(path, before, after),
        }
    }

    /// A container pair that produced no entries (both empty, or only
    /// holding empty values) is still a path present on both sides.
    fn settle_container(&mut self, path: &[PathSegment], emitted_before: usize) {
        if !path.is_empty() && self.count() == emitted_before {
            self.push_unchanged(path);
        }
    }

    fn count(&self) -> usize {
        self.changes.modified_fields.len()
            + self.changes.new_fields.len()
            + self.changes.removed_fields.len()
            + self.changes.unchanged_fields.len()
    }

    fn push_new(&mut self, path: &[PathSegment], after: &MappingNode) {
        self.changes.new_fields.push(FieldChange {
            field_path: FieldPath::render(path),
            prev_value: None,
            new_value: Some(after.clone()),
        });
    }

    fn push_modified(&mut self, path: &[PathSegment], before: &MappingNode, after: &MappingNode) {
        self.changes.modified_fields.push(FieldChange {
            field_path: FieldPath::render(path),
            prev_value: Some(before.clone()),
            new_value: Some(after.clone()),
        });
    }

    fn push_removed(&mut self, path: &[PathSegment]) {
        self.changes.removed_fields.push(FieldPath::render(path));
    }

    fn push_unchanged(&mut self, path: &[PathSegment]) {
        self.changes.unchanged_fields.push(FieldPath::render(path));
    }

    fn finish(mut self) -> ResourceDriftChanges {
        self.changes
            .modified_fields
            .sort_by(|a, b| a.field_path.cmp(&b.field_path));
        self.changes
            .new_fields
            .sort_by(|a, b| a.field_path.cmp(&b.field_path));
        self.changes.removed_fields.sort();
        self.changes.unchanged_fields.sort();
        self.changes
    }
}
