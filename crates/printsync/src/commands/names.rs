//! Printer naming helpers over the current Cirrato printer names.

use serde::Serialize;
use tabled::Tabled;

use printsync_core::{Controller, naming};

use crate::cli::{GlobalOpts, NamesArgs, NamesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct PartRow {
    #[tabled(rename = "Code")]
    code: String,
}

pub fn handle(
    controller: &Controller,
    args: NamesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let names: Vec<String> = controller
        .printers_snapshot()
        .iter()
        .map(|p| p.name.clone())
        .collect();

    let parts = match args.command {
        NamesCommand::Suggest {
            site,
            building,
            floor,
        } => {
            let suggestion = naming::suggest(
                &names,
                site.as_deref(),
                building.as_deref(),
                floor.as_deref(),
            );
            let out = output::render_single(
                &global.output,
                &suggestion,
                |s| s.name.clone().unwrap_or_else(|| s.hint.clone()),
                |s| s.name.clone().unwrap_or_else(|| s.hint.clone()),
            );
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        NamesCommand::Sites => naming::sites(&names),
        NamesCommand::Buildings { site } => naming::buildings(&names, &site),
        NamesCommand::Floors { site, building } => naming::floors(&names, &site, &building),
    };

    let rows: Vec<PartRow> = parts.into_iter().map(|code| PartRow { code }).collect();
    let out = output::render_list(
        &global.output,
        &rows,
        |r| PartRow {
            code: r.code.clone(),
        },
        |r| r.code.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
