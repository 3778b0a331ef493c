//! Region command handlers.

use std::sync::Arc;

use tabled::Tabled;

use printsync_core::{Controller, Region};

use crate::cli::{GlobalOpts, RegionsArgs, RegionsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    name: String,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Printers")]
    printers: usize,
}

pub fn handle(
    controller: &Controller,
    args: RegionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegionsCommand::List => {
            let regions = controller.regions_snapshot();
            let printers = controller.printers_snapshot();
            let row = |r: &Arc<Region>| RegionRow {
                name: r.name.clone(),
                id: r.cirrato_id,
                printers: printers
                    .iter()
                    .filter(|p| p.region.as_ref().is_some_and(|pr| pr.cirrato_id == r.cirrato_id))
                    .count(),
            };
            let out = output::render_list(&global.output, regions.as_slice(), row, |r| r.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
