// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

use crate::model::{Printer, SysManPrinter};

// ── Create ─────────────────────────────────────────────────────────

/// A new printer. The queue is created by the PMC under
/// `{region}\{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePrinterRequest {
    pub name: String,
    /// Region name.
    pub region: String,
    pub ip: String,
    /// Driver name.
    pub driver: String,
    /// Configuration name to bind on every deployed OS of the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    pub description: String,
    pub location: String,
    /// Also register the printer in SysMan.
    pub create_in_sysman: bool,
}

// ── Update ─────────────────────────────────────────────────────────

/// Partial update of an existing printer, identified by its current
/// name. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePrinterRequest {
    /// Current Cirrato name.
    pub printer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// New configuration name. An empty string removes the configuration
    /// from every deployed OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// SysMan description; defaults to the SysMan printer's current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysman_description: Option<String>,
    /// SysMan location; defaults to the SysMan printer's current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysman_location: Option<String>,
}

impl UpdatePrinterRequest {
    pub fn new(printer: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
            ..Self::default()
        }
    }
}

/// An update with every field filled in from the current printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUpdate {
    pub name: String,
    pub ip: String,
    pub driver: String,
    pub region: String,
    /// Configuration name, empty for none.
    pub configuration: String,
    pub description: String,
    pub location: String,
    /// SysMan fields, present only when the printer exists in SysMan.
    pub sysman: Option<SysManFields>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysManFields {
    pub description: String,
    pub location: String,
}

impl UpdatePrinterRequest {
    /// Merge the request over `current` and its SysMan counterpart.
    pub fn resolve(&self, current: &Printer, sysman: Option<&SysManPrinter>) -> ResolvedUpdate {
        let pick = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_owned())
        };
        ResolvedUpdate {
            name: pick(&self.name, &current.name),
            ip: pick(&self.ip, &current.ip),
            driver: pick(&self.driver, current.driver_name()),
            region: pick(&self.region, current.region_name()),
            configuration: pick(&self.configuration, current.configuration_name()),
            description: pick(&self.description, &current.description),
            location: pick(&self.location, &current.location),
            sysman: sysman.map(|s| SysManFields {
                description: pick(&self.sysman_description, &s.description),
                location: pick(&self.sysman_location, &s.location),
            }),
        }
    }
}

impl ResolvedUpdate {
    /// `Field: old > new` lines, Cirrato fields first.
    pub fn changes(&self, current: &Printer, sysman: Option<&SysManPrinter>) -> Vec<String> {
        let mut lines = Vec::new();
        let mut diff = |label: &str, old: &str, new: &str| {
            if old != new {
                lines.push(format!("{label}: {old} > {new}"));
            }
        };
        diff("Name (Cirrato)", &current.name, &self.name);
        diff("IP Address", &current.ip, &self.ip);
        diff("Description (Cirrato)", &current.description, &self.description);
        diff("Location (Cirrato)", &current.location, &self.location);
        diff("Driver", current.driver_name(), &self.driver);
        diff("Region", current.region_name(), &self.region);
        diff("Configuration", current.configuration_name(), &self.configuration);
        if let (Some(existing), Some(fields)) = (sysman, &self.sysman) {
            diff("Name (SysMan)", &existing.name, &self.name);
            diff("Description (SysMan)", &existing.description, &fields.description);
            diff("Location (SysMan)", &existing.location, &fields.location);
        }
        lines
    }

    /// Whether any Cirrato-side value differs from `current`.
    pub fn cirrato_modified(&self, current: &Printer) -> bool {
        self.name != current.name
            || self.ip != current.ip
            || self.description != current.description
            || self.location != current.location
            || self.driver != current.driver_name()
            || self.region != current.region_name()
            || self.configuration != current.configuration_name()
    }

    /// Whether any SysMan-side value differs from `existing`.
    pub fn sysman_modified(&self, existing: &SysManPrinter) -> bool {
        self.sysman.as_ref().is_some_and(|fields| {
            self.name != existing.name
                || fields.description != existing.description
                || fields.location != existing.location
        })
    }
}
