//! bluelink-drift
//!
//! Drift detection and reconciliation for deployed blueprint instances.
//!
//! Public API:
//! - `changes::diff()`: structural comparison of two value trees
//! - `apply_link_overlays()`: place link-managed values on a resource spec
//! - `DriftChecker`: compare persisted state with provider state and
//!   record the result
//! - `Reconciler`: preview resolution of interrupted resources

pub mod changes;
pub mod checker;
pub mod clock;
pub mod config;
pub mod error;
pub mod overlay;
pub mod provider;
pub mod reconcile;

pub use crate::checker::DriftChecker;
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::{DriftConfig, RemovedFieldsPolicy, load_config, save_config};
pub use crate::error::{DriftError, OverlayError, ProviderError};
pub use crate::overlay::apply_link_overlays;
pub use crate::provider::{ExternalStateInput, ProviderRegistry, ResourceProvider};
pub use crate::reconcile::{ReconcileAction, ReconcileResult, Reconciler};
