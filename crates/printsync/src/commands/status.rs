//! Session status: access level and directory counts.

use serde::Serialize;

use printsync_core::{AccessLevel, Controller};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Status {
    pmc_path: String,
    sysman_url: String,
    access: AccessLevel,
    printers: usize,
    sysman_printers: usize,
    orphaned_sysman_printers: usize,
    drivers: usize,
    regions: usize,
}

fn detail(s: &Status) -> String {
    [
        format!("PMC:              {}", s.pmc_path),
        format!("SysMan:           {}", s.sysman_url),
        format!("Access:           {}", s.access),
        format!("Printers:         {}", s.printers),
        format!(
            "SysMan printers:  {} ({} without Cirrato printer)",
            s.sysman_printers, s.orphaned_sysman_printers
        ),
        format!("Drivers:          {}", s.drivers),
        format!("Regions:          {}", s.regions),
    ]
    .join("\n")
}

pub fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let directory = controller.directory();
    let orphans = controller
        .sysman_printers_snapshot()
        .iter()
        .filter(|s| directory.printer_by_name(&s.name).is_none())
        .count();

    let status = Status {
        pmc_path: controller.config().pmc_path.display().to_string(),
        sysman_url: controller.config().sysman_url.to_string(),
        access: controller.access_level(),
        printers: directory.printer_count(),
        sysman_printers: directory.sysman_printer_count(),
        orphaned_sysman_printers: orphans,
        drivers: directory.driver_count(),
        regions: directory.region_count(),
    };

    let out = output::render_single(&global.output, &status, detail, |s| s.access.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
