//! bluelink-core
//!
//! Pure domain types shared by the drift engine and the state store: the
//! value tree, field paths, change sets and persisted deployment state.
//! No I/O lives here.

pub mod changes;
pub mod error;
pub mod models;
pub mod node;
pub mod path;

pub use crate::changes::{FieldChange, ResourceDriftChanges};
pub use crate::error::CoreError;
pub use crate::node::{MappingNode, ScalarValue};
pub use crate::path::{FieldPath, PathSegment};
