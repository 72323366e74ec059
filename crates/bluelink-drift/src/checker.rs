use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bluelink_core::models::{BlueprintParams, ResourceDriftState};
use bluelink_state::{StateContainer, StateError};

use crate::changes;
use crate::clock::{Clock, SystemClock};
use crate::config::{DriftConfig, RemovedFieldsPolicy};
use crate::error::{DriftError, format_err_chain, resource_label};
use crate::overlay::apply_link_overlays;
use crate::provider::{ExternalStateInput, ProviderRegistry, fetch_external_state};

/// Compares persisted resource state with what providers report and
/// records the outcome.
///
/// Holds no mutable state of its own; checks of different resources can
/// run concurrently on one checker.
pub struct DriftChecker {
    state: Arc<dyn StateContainer>,
    providers: Arc<ProviderRegistry>,
    clock: Arc<dyn Clock>,
    removed_fields_policy: RemovedFieldsPolicy,
    provider_timeout: Option<Duration>,
}

impl DriftChecker {
    pub fn new(
        state: Arc<dyn StateContainer>,
        providers: Arc<ProviderRegistry>,
        config: &DriftConfig,
    ) -> Self {
        Self {
            state,
            providers,
            clock: Arc::new(SystemClock),
            removed_fields_policy: config.removed_fields_policy,
            provider_timeout: config.provider_timeout(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check every resource of an instance, one at a time in resource ID
    /// order. Returns drift states keyed by resource ID; clean resources
    /// are absent from the map.
    ///
    /// Any failing resource fails the whole call. Resources checked before
    /// the failure keep their persisted results.
    pub async fn check_drift(
        &self,
        instance_id: &str,
        params: &BlueprintParams,
    ) -> Result<HashMap<String, ResourceDriftState>, DriftError> {
        let instance = self.state.get_instance(instance_id).await?;
        tracing::info!(
            instance_id = %instance_id,
            resources = instance.resources.len(),
            "checking instance for drift"
        );

        let mut drifted = HashMap::new();
        for resource_id in instance.resources.keys() {
            let checked = self
                .check_resource_drift(instance_id, &instance.instance_name, resource_id, params)
                .await
                .inspect_err(|err| {
                    tracing::warn!(
                        instance_id = %instance_id,
                        resource_id = %resource_id,
                        error = %format_err_chain(err),
                        "drift check aborted"
                    );
                })?;
            if let Some(drift) = checked {
                drifted.insert(resource_id.clone(), drift);
            }
        }

        tracing::info!(
            instance_id = %instance_id,
            drifted = drifted.len(),
            "instance drift check complete"
        );
        Ok(drifted)
    }

    /// Check a single resource and persist the outcome.
    ///
    /// Returns `Some` with the drift state when new or modified fields were
    /// found (or removed fields, under [`RemovedFieldsPolicy::CountAsDrift`]),
    /// `None` when the resource is clean. Nothing is written unless the
    /// provider call and the comparison both succeed.
    pub async fn check_resource_drift(
        &self,
        instance_id: &str,
        instance_name: &str,
        resource_id: &str,
        params: &BlueprintParams,
    ) -> Result<Option<ResourceDriftState>, DriftError> {
        let resource = self.state.get_resource(resource_id).await?;
        if resource.instance_id != instance_id {
            return Err(StateError::ResourceNotFound(format!(
                "{resource_id} in instance {instance_id}"
            ))
            .into());
        }
        let links = self.state.get_links(instance_id).await?;
        let label = resource_label(&resource.name, resource_id);

        let expected = apply_link_overlays(&resource.name, &resource.spec_data, &links)
            .map_err(|source| DriftError::LinkOverlay {
                resource: label.clone(),
                source,
            })?;

        let input = ExternalStateInput {
            instance_id,
            instance_name,
            resource_id,
            resource_name: &resource.name,
            resource_type: &resource.resource_type,
            current_spec: &resource.spec_data,
            params,
        };
        let external =
            fetch_external_state(&self.providers, self.provider_timeout, input, &label)
                .await?
                .ok_or_else(|| DriftError::ResourceNotFoundExternally {
                    resource: label.clone(),
                })?;

        let difference = changes::diff(&expected, &external);

        if !self.removed_fields_policy.is_drift(&difference) {
            tracing::debug!(
                resource = %label,
                unchanged = difference.unchanged_fields.len(),
                removed = difference.removed_fields.len(),
                "no drift detected"
            );
            self.state
                .save_drift_check(resource_id, false, None, &ResourceDriftState::cleared())
                .await?;
            return Ok(None);
        }

        let now = self.clock.now();
        tracing::info!(
            resource = %label,
            modified = difference.modified_fields.len(),
            new = difference.new_fields.len(),
            removed = difference.removed_fields.len(),
            "drift detected"
        );

        let drift = ResourceDriftState {
            resource_id: resource.resource_id,
            resource_name: resource.name,
            resource_type: resource.resource_type,
            spec_data: external,
            difference: Some(difference),
            timestamp: Some(now),
        };
        // The resource may have been redeployed since it was read.
        self.state
            .save_drift_check(resource_id, true, Some(now), &drift)
            .await?;

        Ok(Some(drift))
    }
}
