use std::path::{Path, PathBuf};
use std::time::Duration;

use bluelink_core::ResourceDriftChanges;
use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub removed_fields_policy: RemovedFieldsPolicy,
    /// Upper bound on a single provider call. `None` = no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_timeout_secs: Option<u64>,
    /// Where a file-backed state container keeps its document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            removed_fields_policy: RemovedFieldsPolicy::default(),
            provider_timeout_secs: None,
            state_path: None,
        }
    }
}

impl DriftConfig {
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.map(Duration::from_secs)
    }
}

/// Whether fields the provider stopped reporting count as drift.
///
/// A provider omitting a field does not mean the field is gone from the
/// real resource (optional fields are often left out of read responses),
/// so the default only treats new or modified values as drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovedFieldsPolicy {
    #[default]
    Ignore,
    CountAsDrift,
}

impl RemovedFieldsPolicy {
    pub fn is_drift(self, changes: &ResourceDriftChanges) -> bool {
        match self {
            Self::Ignore => changes.has_new_or_modified(),
            Self::CountAsDrift => changes.has_changes(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<DriftConfig, DriftError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        DriftError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(v) => u32::try_from(v).map_err(|_| {
            DriftError::Config(format!("config_version {v} is out of range"))
        })?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: DriftConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, DriftError> {
    if from_version > CURRENT_VERSION {
        return Err(DriftError::Config(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 → v1: boolean `count_removed_as_drift` became `removed_fields_policy`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| DriftError::Config("config is not a JSON object".to_string()))?;
        let count_removed = obj
            .remove("count_removed_as_drift")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let policy = if count_removed {
            RemovedFieldsPolicy::CountAsDrift
        } else {
            RemovedFieldsPolicy::Ignore
        };
        obj.entry("removed_fields_policy")
            .or_insert(serde_json::to_value(policy)?);
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated drift config v0 → v1 (removed_fields_policy)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &DriftConfig) -> Result<(), DriftError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "drift config saved");
    Ok(())
}
