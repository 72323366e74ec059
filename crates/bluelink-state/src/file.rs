use std::path::{Path, PathBuf};

use bluelink_core::models::{InstanceState, LinkState, ResourceDriftState, ResourceState};
use jiff::Timestamp;
use tokio::sync::Mutex;

use crate::container::{BoxFuture, StateContainer};
use crate::error::StateError;
use crate::snapshot::StateSnapshot;

/// State container backed by a single JSON document on local disk.
///
/// Every write goes to a copy of the in-memory snapshot, is flushed with an
/// atomic tmp + rename, and only then replaces the live snapshot. A failed
/// flush leaves both disk and memory at the previous state.
#[derive(Debug)]
pub struct FileStateContainer {
    path: PathBuf,
    state: Mutex<StateSnapshot>,
}

impl FileStateContainer {
    /// Open the state file at `path`, starting fresh if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let state = if path.exists() {
            let json = std::fs::read(&path)?;
            let state: StateSnapshot = serde_json::from_slice(&json)?;
            tracing::debug!(path = %path.display(), "state loaded from local disk");
            state
        } else {
            tracing::debug!(path = %path.display(), "no existing state found, starting fresh");
            StateSnapshot::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update<F>(&self, apply: F) -> Result<(), StateError>
    where
        F: FnOnce(&mut StateSnapshot) -> Result<(), StateError>,
    {
        let mut live = self.state.lock().await;
        let mut next = live.clone();
        apply(&mut next)?;
        flush(&self.path, &next)?;
        *live = next;
        Ok(())
    }
}

/// Atomic local write: tmp file, then rename over the target.
fn flush(path: &Path, state: &StateSnapshot) -> Result<(), StateError> {
    let json = serde_json::to_vec_pretty(state)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json)?;
    std::fs::rename(&tmp_path, path)?;

    tracing::debug!(path = %path.display(), "state flushed to local disk");
    Ok(())
}

impl StateContainer for FileStateContainer {
    fn get_instance<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<InstanceState, StateError>> {
        Box::pin(async move { self.state.lock().await.instance(instance_id).cloned() })
    }

    fn save_instance<'a>(
        &'a self,
        instance: &'a InstanceState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move {
            self.update(|state| {
                state.put_instance(instance.clone());
                Ok(())
            })
            .await
        })
    }

    fn get_resource<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<ResourceState, StateError>> {
        Box::pin(async move { self.state.lock().await.resource(resource_id).cloned() })
    }

    fn save_resource<'a>(
        &'a self,
        resource: &'a ResourceState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move {
            self.update(|state| state.put_resource(resource.clone()))
                .await
        })
    }

    fn get_links<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<LinkState>, StateError>> {
        Box::pin(async move { self.state.lock().await.links(instance_id) })
    }

    fn get_drift<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ResourceDriftState>, StateError>> {
        Box::pin(async move { Ok(self.state.lock().await.drift(resource_id)) })
    }

    fn save_drift_check<'a>(
        &'a self,
        resource_id: &'a str,
        drifted: bool,
        detected_at: Option<Timestamp>,
        drift: &'a ResourceDriftState,
    ) -> BoxFuture<'a, Result<(), StateError>> {
        Box::pin(async move {
            self.update(|state| {
                state.record_drift_check(resource_id, drifted, detected_at, drift)
            })
            .await
        })
    }
}
