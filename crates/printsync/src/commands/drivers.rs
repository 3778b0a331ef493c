//! Driver command handlers.

use std::sync::Arc;

use tabled::Tabled;

use printsync_core::{Controller, Driver};

use crate::cli::{DriversArgs, DriversCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DriverRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Configurations")]
    configurations: String,
    #[tabled(rename = "Operating Systems")]
    systems: String,
}

impl From<&Arc<Driver>> for DriverRow {
    fn from(d: &Arc<Driver>) -> Self {
        Self {
            name: d.name.clone(),
            id: d.cirrato_id.clone(),
            configurations: d.configurations.len().to_string(),
            systems: d.deployed_os.join(", "),
        }
    }
}

fn detail(d: &Arc<Driver>) -> String {
    let mut lines = vec![
        format!("Name:              {}", d.name),
        format!("ID:                {}", d.cirrato_id),
        format!("Operating systems: {}", d.deployed_os.join(", ")),
        "Configurations:".to_owned(),
    ];
    if d.configurations.is_empty() {
        lines.push("  (none)".into());
    }
    for cfg in &d.configurations {
        lines.push(format!("  {} ({})", cfg.name, cfg.cirrato_id));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    controller: &Controller,
    args: DriversArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DriversCommand::List => {
            let snap = controller.drivers_snapshot();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |d| DriverRow::from(d),
                |d| d.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DriversCommand::Get { driver } => {
            let snap = controller.drivers_snapshot();
            let found = snap
                .iter()
                .find(|d| d.name == driver)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "driver".into(),
                    identifier: driver.clone(),
                    list_command: "drivers list".into(),
                })?;
            let out = output::render_single(&global.output, found, detail, |d| d.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
