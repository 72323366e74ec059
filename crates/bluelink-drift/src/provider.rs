use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bluelink_core::MappingNode;
use bluelink_core::models::BlueprintParams;
use bluelink_state::BoxFuture;

use crate::error::{DriftError, ProviderError};

/// What a provider is told about the resource whose state it should fetch.
#[derive(Debug, Clone, Copy)]
pub struct ExternalStateInput<'a> {
    pub instance_id: &'a str,
    pub instance_name: &'a str,
    pub resource_id: &'a str,
    pub resource_name: &'a str,
    pub resource_type: &'a str,
    /// The persisted spec, so the provider can find the resource's
    /// external identifiers (ARNs, names).
    pub current_spec: &'a MappingNode,
    pub params: &'a BlueprintParams,
}

/// The one capability the drift engine needs from a provider plugin.
pub trait ResourceProvider: Send + Sync {
    /// Read the resource's current state from the external system.
    ///
    /// `Ok(None)` means the resource does not exist there. A resource that
    /// exists but reports nothing is `Ok(Some(MappingNode::Empty))`.
    fn get_external_state<'a>(
        &'a self,
        input: ExternalStateInput<'a>,
    ) -> BoxFuture<'a, Result<Option<MappingNode>, ProviderError>>;
}

/// Resource type → provider.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ResourceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(
        mut self,
        resource_type: impl Into<String>,
        provider: Arc<dyn ResourceProvider>,
    ) -> Self {
        self.register(resource_type, provider);
        self
    }

    pub fn register(
        &mut self,
        resource_type: impl Into<String>,
        provider: Arc<dyn ResourceProvider>,
    ) {
        self.providers.insert(resource_type.into(), provider);
    }

    pub fn resolve(&self, resource_type: &str) -> Result<&dyn ResourceProvider, ProviderError> {
        self.providers
            .get(resource_type)
            .map(|p| p.as_ref())
            .ok_or_else(|| ProviderError::NoProvider {
                resource_type: resource_type.to_string(),
            })
    }
}

/// Resolve the provider for `input.resource_type` and fetch external state,
/// bounded by `timeout` when one is configured.
pub(crate) async fn fetch_external_state(
    providers: &ProviderRegistry,
    timeout: Option<Duration>,
    input: ExternalStateInput<'_>,
    resource: &str,
) -> Result<Option<MappingNode>, DriftError> {
    let provider_err = |source| DriftError::Provider {
        resource: resource.to_string(),
        source,
    };

    let provider = providers.resolve(input.resource_type).map_err(provider_err)?;
    let call = provider.get_external_state(input);

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            DriftError::ProviderTimeout {
                resource: resource.to_string(),
                timeout: limit,
            }
        })?,
        None => call.await,
    };

    result.map_err(provider_err)
}
