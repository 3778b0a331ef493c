// ── Driver domain types ──

use serde::{Deserialize, Serialize};

/// A named configuration preset belonging to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Display name (the PMC calls this the configuration comment).
    pub name: String,
    pub cirrato_id: String,
    /// Name of the owning driver.
    pub driver: String,
}

/// A printer model/driver known to Cirrato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub cirrato_id: String,
    pub configurations: Vec<Configuration>,
    /// Operating systems the driver is deployed to, insertion ordered and
    /// without duplicates.
    pub deployed_os: Vec<String>,
}

impl Driver {
    pub fn new(name: impl Into<String>, cirrato_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cirrato_id: cirrato_id.into(),
            configurations: Vec::new(),
            deployed_os: Vec::new(),
        }
    }

    /// Record a deployment, ignoring operating systems already present.
    pub fn add_deployed_os(&mut self, os: &str) {
        if !self.deployed_os.iter().any(|o| o == os) {
            self.deployed_os.push(os.to_owned());
        }
    }

    /// Configuration with the given display name.
    pub fn configuration_by_name(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Configuration with the given Cirrato id.
    pub fn configuration_by_id(&self, id: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.cirrato_id == id)
    }

    /// `OS:configuration-id` pairs binding `configuration_id` on every
    /// deployed operating system.
    pub fn configuration_pairs(&self, configuration_id: &str) -> Vec<String> {
        self.deployed_os
            .iter()
            .map(|os| format!("{os}:{configuration_id}"))
            .collect()
    }
}
