use super::types::{Resource, ResourceStatus};
use std::collections::HashMap;

/// The resources owned by one manager, keyed by name.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    resources: HashMap<String, Resource>,
}

impl LocalCatalog {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// Installs the bootstrap resource list, replacing any previous one.
    ///
    /// Each resource is enabled on insertion. Installing the same list twice leaves the
    /// catalog in the same state. Returns the number of distinct names installed.
    pub fn install(&mut self, resources: Vec<Resource>) -> usize {
        self.resources.clear();

        for mut resource in resources {
            resource.enable();
            if self
                .resources
                .insert(resource.name.clone(), resource)
                .is_some()
            {
                tracing::warn!("Duplicate resource in bootstrap list, keeping the last one");
            }
        }

        tracing::info!("Installed {} local resources", self.resources.len());
        self.resources.len()
    }

    pub fn has(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Flips the enabled flag of an owned resource. Returns `false` for unknown names.
    pub fn set_status(&mut self, name: &str, status: ResourceStatus) -> bool {
        match self.resources.get_mut(name) {
            Some(resource) => {
                match status {
                    ResourceStatus::Enabled => resource.enable(),
                    ResourceStatus::Disabled => resource.disable(),
                }
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
