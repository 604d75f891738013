use serde::{Deserialize, Serialize};

/// Whether a resource currently accepts access requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceStatus {
    Enabled,
    Disabled,
}

/// A named resource owned by exactly one manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub status: ResourceStatus,
}

impl Resource {
    /// Creates a resource in the disabled state; installing it into a catalog enables it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ResourceStatus::Disabled,
        }
    }

    pub fn enable(&mut self) {
        self.status = ResourceStatus::Enabled;
    }

    pub fn disable(&mut self) {
        self.status = ResourceStatus::Disabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.status == ResourceStatus::Enabled
    }
}
