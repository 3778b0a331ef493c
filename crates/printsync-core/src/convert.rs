// ── Listing records → domain types ──
//
// The bulk load indexes later listings into earlier ones: configurations
// attach to drivers by driver name, deployments by driver id, printers
// resolve their driver and region by id, and queue bindings set a
// printer's configuration by queue name. Lookups that miss leave the
// reference empty instead of failing.

use std::sync::Arc;

use printsync_api::pmc::{
    ConfigurationRecord, DeploymentRecord, DriverRecord, PrinterRecord, QueueBinding, RegionRecord,
};
use printsync_api::sysman::SysManPrinterRecord;

use crate::model::{Configuration, Driver, Printer, Region, SysManPrinter};

// ── Drivers ──────────────────────────────────────────────────────────

/// Build drivers with their configurations and deployed operating systems.
pub fn assemble_drivers(
    drivers: Vec<DriverRecord>,
    configurations: Vec<ConfigurationRecord>,
    deployments: Vec<DeploymentRecord>,
) -> Vec<Driver> {
    let mut drivers: Vec<Driver> = drivers
        .into_iter()
        .map(|d| Driver::new(d.name, d.id))
        .collect();

    for record in configurations {
        if let Some(driver) = drivers.iter_mut().find(|d| d.name == record.driver) {
            driver.configurations.push(Configuration {
                name: record.name,
                cirrato_id: record.id,
                driver: record.driver,
            });
        }
    }

    for record in deployments {
        if let Some(driver) = drivers.iter_mut().find(|d| d.cirrato_id == record.driver_id) {
            driver.add_deployed_os(&record.os);
        }
    }

    drivers
}

// ── Regions ──────────────────────────────────────────────────────────

impl From<RegionRecord> for Region {
    fn from(r: RegionRecord) -> Self {
        Self {
            name: r.name,
            cirrato_id: r.id.unwrap_or_default(),
        }
    }
}

// ── Printers ─────────────────────────────────────────────────────────

/// Resolve printer records against the loaded drivers and regions.
pub fn assemble_printers(
    records: Vec<PrinterRecord>,
    drivers: &[Arc<Driver>],
    regions: &[Arc<Region>],
) -> Vec<Printer> {
    records
        .into_iter()
        .map(|r| {
            let driver = drivers.iter().find(|d| d.cirrato_id == r.driver_id).cloned();
            let region = r.region_id.and_then(|id| {
                regions
                    .iter()
                    .find(|reg| reg.cirrato_id == id)
                    .map(|reg| reg.as_ref().clone())
            });
            Printer {
                name: r.name,
                cirrato_id: r.id,
                sysman_id: String::new(),
                driver,
                region,
                description: r.description,
                location: r.location,
                ip: r.ip,
                exists_in_sysman: false,
                configuration: None,
            }
        })
        .collect()
}

/// Set each bound printer's configuration name. Bindings without a
/// configuration id, for unknown printers, or for configuration ids no
/// driver knows leave the printer untouched.
pub fn apply_queue_bindings(
    printers: &mut [Printer],
    bindings: &[QueueBinding],
    drivers: &[Arc<Driver>],
) {
    for binding in bindings {
        if binding.configuration_id.trim().is_empty() {
            continue;
        }
        let Some(printer) = printers.iter_mut().find(|p| p.name == binding.queue_name) else {
            continue;
        };
        let name = drivers
            .iter()
            .find_map(|d| d.configuration_by_id(&binding.configuration_id))
            .map(|c| c.name.clone());
        if name.is_some() {
            printer.configuration = name;
        }
    }
}

// ── SysMan ───────────────────────────────────────────────────────────

impl From<SysManPrinterRecord> for SysManPrinter {
    fn from(r: SysManPrinterRecord) -> Self {
        Self {
            name: r.name,
            id: r.id,
            description: r.description.unwrap_or_default(),
            location: r.location.unwrap_or_default(),
            server: r.server.unwrap_or_default(),
            tag: r.tag.unwrap_or_default(),
            can_be_default: r.can_be_default,
            can_be_removed: r.can_be_removed,
        }
    }
}
