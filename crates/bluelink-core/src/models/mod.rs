pub mod drift;
pub mod instance;
pub mod link;
pub mod params;
pub mod resource;
pub mod status;

pub use drift::{DriftRecord, ResourceDriftState};
pub use instance::InstanceState;
pub use link::LinkState;
pub use params::BlueprintParams;
pub use resource::ResourceState;
pub use status::{InstanceStatus, PreciseResourceStatus, ResourceStatus};
