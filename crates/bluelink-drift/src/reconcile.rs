use std::sync::Arc;
use std::time::Duration;

use bluelink_core::models::{BlueprintParams, PreciseResourceStatus, ResourceState};
use bluelink_core::{MappingNode, ResourceDriftChanges};
use bluelink_state::StateContainer;
use serde::{Deserialize, Serialize};

use crate::changes;
use crate::config::DriftConfig;
use crate::error::{DriftError, resource_label};
use crate::provider::{ExternalStateInput, ProviderRegistry, fetch_external_state};

/// Preview of how an interrupted resource would be resolved. Never
/// persisted; a separate apply step commits whatever the caller decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileResult {
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub old_status: PreciseResourceStatus,
    pub new_status: PreciseResourceStatus,
    /// `None` when the resource does not exist externally.
    pub external_state: Option<MappingNode>,
    pub persisted_state: MappingNode,
    /// Persisted vs external comparison. `None` when the resource does not
    /// exist externally.
    pub state_changes: Option<ResourceDriftChanges>,
}

/// What an apply step would typically do with a [`ReconcileResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    /// Take the external state as the new persisted spec.
    AcceptExternal,
    /// Only the status needs to move to `new_status`.
    UpdateStatus,
    /// The operation did not take effect; record it as failed.
    MarkFailed,
}

impl ReconcileResult {
    pub fn resource_exists(&self) -> bool {
        self.external_state.is_some()
    }

    pub fn has_state_changes(&self) -> bool {
        self.state_changes
            .as_ref()
            .is_some_and(ResourceDriftChanges::has_changes)
    }

    pub fn recommended_action(&self) -> ReconcileAction {
        match (self.resource_exists(), self.old_status) {
            // A destroy that finished and one that left the resource behind
            // both only need their status recorded.
            (_, PreciseResourceStatus::DestroyInterrupted) => ReconcileAction::UpdateStatus,
            (false, _) => ReconcileAction::MarkFailed,
            (true, _) if self.has_state_changes() => ReconcileAction::AcceptExternal,
            (true, _) => ReconcileAction::UpdateStatus,
        }
    }
}

/// Builds reconciliation previews for resources a killed deployment left
/// in an interrupted status.
pub struct Reconciler {
    state: Arc<dyn StateContainer>,
    providers: Arc<ProviderRegistry>,
    provider_timeout: Option<Duration>,
}

impl Reconciler {
    pub fn new(
        state: Arc<dyn StateContainer>,
        providers: Arc<ProviderRegistry>,
        config: &DriftConfig,
    ) -> Self {
        Self {
            state,
            providers,
            provider_timeout: config.provider_timeout(),
        }
    }

    /// Preview reconciliation of one resource.
    ///
    /// Fails with [`DriftError::NotInterrupted`] before any provider call if
    /// the resource is not in an interrupted status.
    pub async fn reconcile(
        &self,
        resource_id: &str,
        params: &BlueprintParams,
    ) -> Result<ReconcileResult, DriftError> {
        let resource = self.state.get_resource(resource_id).await?;
        if !resource.precise_status.is_interrupted() {
            return Err(DriftError::NotInterrupted {
                resource_id: resource_id.to_string(),
                status: resource.precise_status,
            });
        }
        let instance = self.state.get_instance(&resource.instance_id).await?;
        self.preview(&instance.instance_name, resource, params)
            .await
    }

    /// Preview reconciliation of every interrupted resource in an instance,
    /// in resource ID order. Resources in any other status are skipped.
    pub async fn reconcile_instance(
        &self,
        instance_id: &str,
        params: &BlueprintParams,
    ) -> Result<Vec<ReconcileResult>, DriftError> {
        let instance = self.state.get_instance(instance_id).await?;
        let mut results = Vec::new();
        for resource in instance.resources.values() {
            if !resource.precise_status.is_interrupted() {
                continue;
            }
            let result = self
                .preview(&instance.instance_name, resource.clone(), params)
                .await?;
            results.push(result);
        }

        tracing::info!(
            instance_id = %instance_id,
            interrupted = results.len(),
            "reconciliation preview complete"
        );
        Ok(results)
    }

    async fn preview(
        &self,
        instance_name: &str,
        resource: ResourceState,
        params: &BlueprintParams,
    ) -> Result<ReconcileResult, DriftError> {
        let label = resource_label(&resource.name, &resource.resource_id);
        let input = ExternalStateInput {
            instance_id: &resource.instance_id,
            instance_name,
            resource_id: &resource.resource_id,
            resource_name: &resource.name,
            resource_type: &resource.resource_type,
            current_spec: &resource.spec_data,
            params,
        };
        let external =
            fetch_external_state(&self.providers, self.provider_timeout, input, &label).await?;

        let old_status = resource.precise_status;
        let (new_status, state_changes) = match &external {
            Some(external) => (
                old_status.resolved_when_present(),
                Some(changes::diff(&resource.spec_data, external)),
            ),
            None => (old_status.resolved_when_absent(), None),
        };
        // Callers only reach here with an interrupted status.
        let new_status = new_status.unwrap_or(old_status);

        tracing::info!(
            resource = %label,
            old_status = %old_status,
            new_status = %new_status,
            exists = external.is_some(),
            "reconciliation previewed"
        );

        Ok(ReconcileResult {
            resource_id: resource.resource_id,
            resource_name: resource.name,
            resource_type: resource.resource_type,
            old_status,
            new_status,
            external_state: external,
            persisted_state: resource.spec_data,
            state_changes,
        })
    }
}
