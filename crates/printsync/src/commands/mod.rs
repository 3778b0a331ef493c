//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod drivers;
pub mod login;
pub mod names;
pub mod printers;
pub mod regions;
pub mod status;
pub mod sysman;
pub mod util;

use printsync_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a directory-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Printers(args) => printers::handle(controller, args, global).await,
        Command::Drivers(args) => drivers::handle(controller, args, global),
        Command::Regions(args) => regions::handle(controller, args, global),
        Command::Sysman(args) => sysman::handle(controller, args, global),
        Command::Names(args) => names::handle(controller, args, global),
        Command::Status => status::handle(controller, global),
        // Config, Completions and Login are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Login(_) => unreachable!(),
    }
}
