// PMC listing records.
//
// Wire-level shapes of the six verbose listings. Identifiers that point
// at other entities stay as raw ids here; `printsync-core` resolves them
// when it assembles the directory.

use super::parse::{LineRecord, bare_value, last_quoted_value, quoted_value};

// ── Drivers ──────────────────────────────────────────────────────────

/// One entry of `model list --verbose`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverRecord {
    pub name: String,
    pub id: String,
    pub visible: bool,
}

impl LineRecord for DriverRecord {
    fn accept(&mut self, line: &str) {
        if line.contains("modelName") {
            self.name = quoted_value(line);
        } else if line.contains("modelId") {
            self.id = quoted_value(line);
        } else if line == r#""modelVisible": 1,"# {
            self.visible = true;
        }
    }

    fn is_touched(&self) -> bool {
        self.visible || !self.name.is_empty() || !self.id.is_empty()
    }

    fn is_emitted(&self) -> bool {
        self.visible
    }
}

// ── Configurations ───────────────────────────────────────────────────

/// One entry of `configuration list --verbose`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationRecord {
    pub name: String,
    pub id: String,
    /// Name of the owning driver.
    pub driver: String,
}

impl LineRecord for ConfigurationRecord {
    fn accept(&mut self, line: &str) {
        if line.contains("configfile_comment") {
            self.name = quoted_value(line);
        } else if line.contains("configfile_id") {
            self.id = quoted_value(line);
        } else if line.contains("configfile_model") {
            self.driver = quoted_value(line);
        }
    }

    fn is_touched(&self) -> bool {
        !self.name.is_empty() || !self.id.is_empty() || !self.driver.is_empty()
    }
}

// ── Deployments ──────────────────────────────────────────────────────

/// One entry of `deployment list --verbose`: an OS a driver is
/// deployed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub os: String,
    pub driver_id: String,
}

impl LineRecord for DeploymentRecord {
    fn accept(&mut self, line: &str) {
        if line.contains("mapOsId") {
            self.os = quoted_value(line);
        } else if line.contains("mapModelId") {
            self.driver_id = quoted_value(line);
        }
    }

    fn is_touched(&self) -> bool {
        !self.os.is_empty() || !self.driver_id.is_empty()
    }
}

// ── Regions ──────────────────────────────────────────────────────────

/// One entry of `region list -p / --verbose`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRecord {
    /// Full path of the region, e.g. `Region1`.
    pub name: String,
    /// `None` when the id field was missing or not an integer.
    pub id: Option<i64>,
}

impl LineRecord for RegionRecord {
    fn accept(&mut self, line: &str) {
        if line.contains("regionFullPath") {
            self.name = quoted_value(line);
        } else if line.contains("regionId") {
            self.id = bare_value(line).trim().parse().ok();
        }
    }

    fn is_touched(&self) -> bool {
        !self.name.is_empty() || self.id.is_some()
    }
}

// ── Printers ─────────────────────────────────────────────────────────

/// One entry of `printer list -p * --verbose`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterRecord {
    pub name: String,
    pub id: String,
    pub location: String,
    pub ip: String,
    pub region_id: Option<i64>,
    pub description: String,
    /// Id of the driver from `printerModel`. The listing's `modelId` field
    /// is a different property and is ignored.
    pub driver_id: String,
}

impl LineRecord for PrinterRecord {
    fn accept(&mut self, line: &str) {
        if line.contains("printerName") {
            self.name = quoted_value(line);
        } else if line.contains("printerId") {
            self.id = quoted_value(line);
        } else if line.contains("printerLocation") {
            self.location = quoted_value(line);
        } else if line.contains("printerIp") {
            self.ip = quoted_value(line);
        } else if line.contains("region") {
            self.region_id = bare_value(line).trim().parse().ok();
        } else if line.contains("printerComment") {
            self.description = quoted_value(line);
        } else if line.contains("printerModel") {
            self.driver_id = quoted_value(line);
        }
    }

    fn is_touched(&self) -> bool {
        !self.name.is_empty() || !self.id.is_empty()
    }
}

// ── Queue bindings ───────────────────────────────────────────────────

/// One entry of `queue list --path * --verbose`: the configuration bound to
/// a printer's queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueBinding {
    pub queue_name: String,
    /// Id of the last configuration listed under the queue, empty if none.
    pub configuration_id: String,
    in_configurations: bool,
}

impl QueueBinding {
    pub fn new(queue_name: impl Into<String>, configuration_id: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            configuration_id: configuration_id.into(),
            in_configurations: false,
        }
    }
}

impl LineRecord for QueueBinding {
    fn accept(&mut self, line: &str) {
        if line.contains("queueName") {
            self.queue_name = quoted_value(line);
        } else if line.contains("Configurations") && !line.contains(']') {
            self.in_configurations = true;
        }
    }

    fn in_nested_block(&self) -> bool {
        self.in_configurations
    }

    fn accept_nested(&mut self, line: &str) {
        if line.contains("ConfigurationFileId") {
            self.configuration_id = last_quoted_value(line);
        }
        if line.contains(']') {
            self.in_configurations = false;
        }
    }

    fn is_touched(&self) -> bool {
        !self.queue_name.is_empty()
    }
}
