use std::time::Duration;

use bluelink_core::CoreError;
use bluelink_core::models::PreciseResourceStatus;
use bluelink_state::StateError;
use thiserror::Error;

/// Failures reported by a provider plugin or while resolving one.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no provider registered for resource type {resource_type}")]
    NoProvider { resource_type: String },

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("provider error: {0}")]
    Plugin(String),
}

/// A link mapping that cannot be written into a resource spec.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("link {link}: {source}")]
    InvalidPath {
        link: String,
        #[source]
        source: CoreError,
    },

    #[error("link {link}: cannot write {path}, found {found} where {expected} is required")]
    Conflict {
        link: String,
        path: String,
        found: &'static str,
        expected: &'static str,
    },

    #[error("link {link}: index {index} in {path} is too far past the end of a list of {len}")]
    IndexOutOfRange {
        link: String,
        path: String,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Error)]
pub enum DriftError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("provider error for {resource}: {source}")]
    Provider {
        resource: String,
        #[source]
        source: ProviderError,
    },

    #[error("provider call for {resource} timed out after {timeout:?}")]
    ProviderTimeout { resource: String, timeout: Duration },

    #[error("resource {resource} no longer exists in the external system")]
    ResourceNotFoundExternally { resource: String },

    #[error("link overlay failed for {resource}: {source}")]
    LinkOverlay {
        resource: String,
        #[source]
        source: OverlayError,
    },

    #[error("resource {resource_id} is not interrupted (status: {status})")]
    NotInterrupted {
        resource_id: String,
        status: PreciseResourceStatus,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Label used in error messages: `name (id)`.
pub(crate) fn resource_label(name: &str, resource_id: &str) -> String {
    format!("{name} ({resource_id})")
}

/// Walk the full error chain and join all causes into one string.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
