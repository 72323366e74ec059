//! bluelink-state
//!
//! State store contract for deployed instances, resources, links and drift
//! records, plus an in-memory and a file-backed implementation.

pub mod container;
pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;

pub use crate::container::{BoxFuture, StateContainer};
pub use crate::error::StateError;
pub use crate::file::FileStateContainer;
pub use crate::memory::MemoryStateContainer;
pub use crate::snapshot::StateSnapshot;
