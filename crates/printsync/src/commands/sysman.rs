//! SysMan command handlers.

use std::sync::Arc;

use tabled::Tabled;

use printsync_core::{Controller, SysManPrinter};

use crate::cli::{GlobalOpts, SysmanArgs, SysmanCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SysManRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Default")]
    can_be_default: String,
}

impl From<&Arc<SysManPrinter>> for SysManRow {
    fn from(p: &Arc<SysManPrinter>) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            location: p.location.clone(),
            server: p.server.clone(),
            can_be_default: output::yes_no(p.can_be_default),
        }
    }
}

pub fn handle(
    controller: &Controller,
    args: SysmanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let all = controller.sysman_printers_snapshot();
    let printers: Vec<Arc<SysManPrinter>> = match args.command {
        SysmanCommand::List => all.iter().cloned().collect(),
        SysmanCommand::Orphans => {
            let cirrato = controller.printers_snapshot();
            all.iter()
                .filter(|s| !cirrato.iter().any(|p| p.name == s.name))
                .cloned()
                .collect()
        }
    };

    let out = output::render_list(
        &global.output,
        &printers,
        |p| SysManRow::from(p),
        |p| p.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
