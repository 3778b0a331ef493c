// ── Printer directory ──
//
// In-memory view of both backends for one session. Collections are
// replaced wholesale on reload; only newly created printers are added
// in place.

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Driver, Printer, Region, SysManPrinter};

/// Reactive store for drivers, regions, printers and SysMan printers.
pub struct Directory {
    pub(crate) printers: EntityCollection<Printer>,
    pub(crate) sysman_printers: EntityCollection<SysManPrinter>,
    pub(crate) drivers: EntityCollection<Driver>,
    pub(crate) regions: EntityCollection<Region>,
}

impl Directory {
    pub fn new() -> Self {
        Self {
            printers: EntityCollection::new(),
            sysman_printers: EntityCollection::new(),
            drivers: EntityCollection::new(),
            regions: EntityCollection::new(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn printers_snapshot(&self) -> Arc<Vec<Arc<Printer>>> {
        self.printers.snapshot()
    }

    pub fn sysman_printers_snapshot(&self) -> Arc<Vec<Arc<SysManPrinter>>> {
        self.sysman_printers.snapshot()
    }

    pub fn drivers_snapshot(&self) -> Arc<Vec<Arc<Driver>>> {
        self.drivers.snapshot()
    }

    pub fn regions_snapshot(&self) -> Arc<Vec<Arc<Region>>> {
        self.regions.snapshot()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_printers(&self) -> watch::Receiver<Arc<Vec<Arc<Printer>>>> {
        self.printers.subscribe()
    }

    pub fn subscribe_sysman_printers(&self) -> watch::Receiver<Arc<Vec<Arc<SysManPrinter>>>> {
        self.sysman_printers.subscribe()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn printer_by_name(&self, name: &str) -> Option<Arc<Printer>> {
        self.printers.find(|p| p.name == name)
    }

    pub fn printer_by_ip(&self, ip: &str) -> Option<Arc<Printer>> {
        self.printers.find(|p| p.ip == ip)
    }

    pub fn sysman_printer_by_name(&self, name: &str) -> Option<Arc<SysManPrinter>> {
        self.sysman_printers.find(|p| p.name == name)
    }

    pub fn driver_by_name(&self, name: &str) -> Option<Arc<Driver>> {
        self.drivers.find(|d| d.name == name)
    }

    pub fn driver_by_id(&self, id: &str) -> Option<Arc<Driver>> {
        self.drivers.find(|d| d.cirrato_id == id)
    }

    pub fn region_by_name(&self, name: &str) -> Option<Arc<Region>> {
        self.regions.find(|r| r.name == name)
    }

    pub fn region_by_id(&self, id: i64) -> Option<Arc<Region>> {
        self.regions.find(|r| r.cirrato_id == id)
    }

    // ── Mutation ─────────────────────────────────────────────────────

    pub fn replace_printers(&self, printers: Vec<Printer>) {
        self.printers.replace(printers);
    }

    pub fn replace_sysman_printers(&self, printers: Vec<SysManPrinter>) {
        self.sysman_printers.replace(printers);
    }

    pub fn replace_drivers(&self, drivers: Vec<Driver>) {
        self.drivers.replace(drivers);
    }

    pub fn replace_regions(&self, regions: Vec<Region>) {
        self.regions.replace(regions);
    }

    /// Append a newly created Cirrato printer.
    pub fn add_printer(&self, printer: Printer) -> Arc<Printer> {
        self.printers.push(printer)
    }

    /// Append a newly created SysMan printer.
    pub fn add_sysman_printer(&self, printer: SysManPrinter) -> Arc<SysManPrinter> {
        self.sysman_printers.push(printer)
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn printer_count(&self) -> usize {
        self.printers.len()
    }

    pub fn sysman_printer_count(&self) -> usize {
        self.sysman_printers.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Combined version of all collections; changes whenever any of them
    /// is mutated.
    pub fn version(&self) -> u64 {
        self.printers.version()
            + self.sysman_printers.version()
            + self.drivers.version()
            + self.regions.version()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::printer::fixtures::printer;

    #[test]
    fn lookups_return_first_match() {
        let dir = Directory::new();
        let mut second = printer("Dup", "10.0.0.2");
        second.cirrato_id = "second".into();
        dir.replace_printers(vec![printer("Dup", "10.0.0.1"), second]);

        assert_eq!(dir.printer_by_name("Dup").unwrap().ip, "10.0.0.1");
        assert_eq!(dir.printer_by_ip("10.0.0.2").unwrap().cirrato_id, "second");
        assert!(dir.printer_by_name("dup").is_none());
    }

    #[test]
    fn add_printer_appends_to_snapshot() {
        let dir = Directory::new();
        dir.replace_printers(vec![printer("A", "10.0.0.1")]);
        dir.add_printer(printer("B", "10.0.0.2"));

        let names: Vec<String> = dir
            .printers_snapshot()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn driver_and_region_lookups() {
        let dir = Directory::new();
        dir.replace_drivers(vec![Driver::new("HP", "d-1")]);
        dir.replace_regions(vec![Region {
            name: "Region1".into(),
            cirrato_id: 3,
        }]);

        assert_eq!(dir.driver_by_id("d-1").unwrap().name, "HP");
        assert!(dir.driver_by_name("HP").is_some());
        assert_eq!(dir.region_by_id(3).unwrap().name, "Region1");
        assert!(dir.region_by_name("Region2").is_none());
    }

    #[test]
    fn version_changes_on_mutation() {
        let dir = Directory::new();
        let before = dir.version();
        dir.add_sysman_printer(SysManPrinter {
            name: "P".into(),
            id: 1,
            description: String::new(),
            location: String::new(),
            server: "Cirrato".into(),
            tag: String::new(),
            can_be_default: true,
            can_be_removed: false,
        });
        assert!(dir.version() > before);
        assert_eq!(dir.sysman_printer_count(), 1);
    }
}
