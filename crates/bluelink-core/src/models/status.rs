use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse lifecycle status of a deployed resource, as shown to users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Unknown,
    Creating,
    Created,
    CreateFailed,
    Destroying,
    Destroyed,
    DestroyFailed,
    Updating,
    Updated,
    UpdateFailed,
    RollingBack,
    RollbackFailed,
    RollbackComplete,
    CreateInterrupted,
    UpdateInterrupted,
    DestroyInterrupted,
}

/// Coarse status of a whole blueprint instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    #[default]
    Unknown,
    Preparing,
    Deploying,
    Deployed,
    DeployFailed,
    Updating,
    Updated,
    UpdateFailed,
    Destroying,
    Destroyed,
    DestroyFailed,
    RollingBack,
    RollbackFailed,
    RollbackComplete,
    DeployInterrupted,
    UpdateInterrupted,
    DestroyInterrupted,
}

/// Fine-grained lifecycle status of a deployed resource.
///
/// The `*Interrupted` variants are written when a deployment process dies
/// mid-operation; they are the only statuses the reconciler accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreciseResourceStatus {
    #[default]
    Unknown,
    Creating,
    Created,
    CreateFailed,
    CreateRollingBack,
    CreateRollbackFailed,
    CreateRollbackComplete,
    Destroying,
    Destroyed,
    DestroyFailed,
    DestroyRollingBack,
    DestroyRollbackFailed,
    DestroyRollbackComplete,
    Updating,
    Updated,
    UpdateFailed,
    UpdateRollingBack,
    UpdateRollbackFailed,
    UpdateRollbackComplete,
    CreateInterrupted,
    UpdateInterrupted,
    DestroyInterrupted,
}

impl PreciseResourceStatus {
    pub fn is_interrupted(self) -> bool {
        matches!(
            self,
            Self::CreateInterrupted | Self::UpdateInterrupted | Self::DestroyInterrupted
        )
    }

    /// The coarse status this precise status is reported as. Every
    /// rollback stage collapses into the three rollback statuses.
    pub fn coarse(self) -> ResourceStatus {
        match self {
            Self::Unknown => ResourceStatus::Unknown,
            Self::Creating => ResourceStatus::Creating,
            Self::Created => ResourceStatus::Created,
            Self::CreateFailed => ResourceStatus::CreateFailed,
            Self::Destroying => ResourceStatus::Destroying,
            Self::Destroyed => ResourceStatus::Destroyed,
            Self::DestroyFailed => ResourceStatus::DestroyFailed,
            Self::Updating => ResourceStatus::Updating,
            Self::Updated => ResourceStatus::Updated,
            Self::UpdateFailed => ResourceStatus::UpdateFailed,
            Self::CreateRollingBack | Self::DestroyRollingBack | Self::UpdateRollingBack => {
                ResourceStatus::RollingBack
            }
            Self::CreateRollbackFailed
            | Self::DestroyRollbackFailed
            | Self::UpdateRollbackFailed => ResourceStatus::RollbackFailed,
            Self::CreateRollbackComplete
            | Self::DestroyRollbackComplete
            | Self::UpdateRollbackComplete => ResourceStatus::RollbackComplete,
            Self::CreateInterrupted => ResourceStatus::CreateInterrupted,
            Self::UpdateInterrupted => ResourceStatus::UpdateInterrupted,
            Self::DestroyInterrupted => ResourceStatus::DestroyInterrupted,
        }
    }

    /// Status to move to when the resource turns out to exist externally.
    ///
    /// A destroy that left the resource behind did not complete, so it
    /// resolves to `DestroyFailed`. `None` for non-interrupted statuses.
    pub fn resolved_when_present(self) -> Option<Self> {
        match self {
            Self::CreateInterrupted => Some(Self::Created),
            Self::UpdateInterrupted => Some(Self::Updated),
            Self::DestroyInterrupted => Some(Self::DestroyFailed),
            _ => None,
        }
    }

    /// Status to move to when the resource is missing externally.
    pub fn resolved_when_absent(self) -> Option<Self> {
        match self {
            Self::CreateInterrupted => Some(Self::CreateFailed),
            Self::UpdateInterrupted => Some(Self::UpdateFailed),
            Self::DestroyInterrupted => Some(Self::Destroyed),
            _ => None,
        }
    }
}

impl fmt::Display for PreciseResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the serde names so logs and persisted state agree.
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{self:?}"));
        f.write_str(&name)
    }
}
