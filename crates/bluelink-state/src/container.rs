use std::future::Future;
use std::pin::Pin;

use bluelink_core::models::{InstanceState, LinkState, ResourceDriftState, ResourceState};
use jiff::Timestamp;

use crate::error::StateError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable storage for deployed state and drift records.
///
/// Implementations must give read-your-writes consistency per resource ID.
/// No cross-resource transactions are assumed. Methods return boxed futures
/// so the trait stays dyn-compatible.
pub trait StateContainer: Send + Sync {
    fn get_instance<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<InstanceState, StateError>>;

    fn save_instance<'a>(
        &'a self,
        instance: &'a InstanceState,
    ) -> BoxFuture<'a, Result<(), StateError>>;

    fn get_resource<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<ResourceState, StateError>>;

    /// Replace a resource within its owning instance.
    fn save_resource<'a>(
        &'a self,
        resource: &'a ResourceState,
    ) -> BoxFuture<'a, Result<(), StateError>>;

    /// Links of an instance, ordered by link name.
    fn get_links<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<LinkState>, StateError>>;

    /// `None` if the resource was never checked; an empty record if the last
    /// check was clean.
    fn get_drift<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ResourceDriftState>, StateError>>;

    /// Persist the outcome of one drift check.
    ///
    /// Applied to the resource as stored at write time: only `drifted` and,
    /// when `detected_at` is `Some`, `last_drift_detected_timestamp` change.
    /// The drift record is replaced. Both land or neither does.
    fn save_drift_check<'a>(
        &'a self,
        resource_id: &'a str,
        drifted: bool,
        detected_at: Option<Timestamp>,
        drift: &'a ResourceDriftState,
    ) -> BoxFuture<'a, Result<(), StateError>>;
}
