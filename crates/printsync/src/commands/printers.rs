//! Printer command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use printsync_core::{
    Command as CoreCommand, CommandResult, Controller, CreatePrinterRequest, CreateStatus,
    Printer, PrinterFilter, UpdatePrinterRequest, filter_printers,
};

use crate::cli::{FilterField, GlobalOpts, PrintersArgs, PrintersCommand, UpdatePrinterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PrinterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Configuration")]
    configuration: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "SysMan")]
    sysman: String,
}

impl From<&Arc<Printer>> for PrinterRow {
    fn from(p: &Arc<Printer>) -> Self {
        Self {
            name: p.name.clone(),
            ip: p.ip.clone(),
            driver: p.driver_name().to_owned(),
            configuration: p.configuration_name().to_owned(),
            region: p.region_name().to_owned(),
            location: p.location.clone(),
            sysman: if p.exists_in_sysman {
                p.sysman_id.clone()
            } else {
                "-".into()
            },
        }
    }
}

#[derive(Tabled, Serialize)]
struct TargetRow {
    #[tabled(rename = "Computer")]
    computer: String,
}

fn detail(p: &Arc<Printer>) -> String {
    p.to_string().trim_end().to_owned()
}

fn to_filter(field: FilterField) -> PrinterFilter {
    match field {
        FilterField::Name => PrinterFilter::Name,
        FilterField::Ip => PrinterFilter::Ip,
        FilterField::Driver => PrinterFilter::Driver,
        FilterField::Region => PrinterFilter::Region,
        FilterField::Description => PrinterFilter::Description,
        FilterField::Location => PrinterFilter::Location,
    }
}

/// Structured formats get the whole report on stdout; the table format
/// relies on the status lines alone.
fn print_report<T: Serialize>(report: &T, global: &GlobalOpts) {
    let out = output::render_single(&global.output, report, |_| String::new(), |_| String::new());
    output::print_output(&out, global.quiet);
}

fn update_request(args: UpdatePrinterArgs) -> UpdatePrinterRequest {
    UpdatePrinterRequest {
        printer: args.printer,
        name: args.name,
        ip: args.ip,
        driver: args.driver,
        region: args.region,
        configuration: if args.no_configuration {
            Some(String::new())
        } else {
            args.configuration
        },
        description: args.description,
        location: args.location,
        sysman_description: args.sysman_description,
        sysman_location: args.sysman_location,
    }
}

fn unexpected(result: &CommandResult) -> CliError {
    CliError::Internal(format!("unexpected command result: {result:?}"))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    controller: &Controller,
    args: PrintersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PrintersCommand::List { search, field } => {
            let all = controller.printers_snapshot();
            let matched = filter_printers(&all, to_filter(field), search.as_deref().unwrap_or(""));
            let out = output::render_list(
                &global.output,
                &matched,
                |p| PrinterRow::from(p),
                |p| p.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PrintersCommand::Get { printer } => {
            let found = util::find_printer(controller, &printer)?;
            let out = output::render_single(&global.output, &found, detail, |p| p.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PrintersCommand::Create {
            name,
            region,
            ip,
            driver,
            configuration,
            description,
            location,
            no_sysman,
        } => {
            let request = CreatePrinterRequest {
                name,
                region,
                ip,
                driver,
                configuration,
                description,
                location,
                create_in_sysman: !no_sysman,
            };
            let bar = util::spinner("Creating printer...", global);
            let result = controller.execute(CoreCommand::CreatePrinter(request)).await;
            bar.finish_and_clear();

            let result = result?;
            let CommandResult::Created(report) = &result else {
                return Err(unexpected(&result));
            };
            print_report(report, global);
            let successes = if report.status == CreateStatus::Failed {
                Vec::new()
            } else {
                vec![report.status.message().to_owned()]
            };
            util::finish_report("create printer", &successes, &report.errors, global)
        }

        PrintersCommand::Update(args) => {
            let current = util::find_printer(controller, &args.printer)?;
            let existing = controller.directory().sysman_printer_by_name(&current.name);
            let request = update_request(args);
            let changes = request
                .resolve(&current, existing.as_deref())
                .changes(&current, existing.as_deref());

            if changes.is_empty() {
                if !global.quiet {
                    eprintln!("No changes to save.");
                }
                return Ok(());
            }
            if !global.quiet {
                eprintln!("Saving the following changes to {}:", current.name);
                for change in &changes {
                    eprintln!("  {change}");
                }
            }
            if !util::confirm("Save these changes?", global.yes)? {
                return Ok(());
            }

            let bar = util::spinner("Updating printer...", global);
            let result = controller.execute(CoreCommand::UpdatePrinter(request)).await;
            bar.finish_and_clear();

            let result = result?;
            let CommandResult::Updated(report) = &result else {
                return Err(unexpected(&result));
            };
            print_report(report, global);
            let mut successes = Vec::new();
            if report.cirrato_updated {
                successes.push("Updated printer in Cirrato".to_owned());
            }
            if report.sysman_updated {
                successes.push("Updated printer in SysMan".to_owned());
            }
            util::finish_report("update printer", &successes, &report.errors, global)
        }

        PrintersCommand::Delete { printer } => {
            let current = util::find_printer(controller, &printer)?;
            let systems = if current.exists_in_sysman {
                "Cirrato and SysMan"
            } else {
                "Cirrato"
            };
            if !util::confirm(
                &format!("Delete printer {} from {systems}?", current.name),
                global.yes,
            )? {
                return Ok(());
            }

            let bar = util::spinner("Deleting printer...", global);
            let result = controller
                .execute(CoreCommand::DeletePrinter {
                    name: current.name.clone(),
                })
                .await;
            bar.finish_and_clear();

            let result = result?;
            let CommandResult::Deleted(report) = &result else {
                return Err(unexpected(&result));
            };
            print_report(report, global);
            let mut successes = Vec::new();
            if report.cirrato_deleted {
                successes.push("Deleted printer in Cirrato".to_owned());
            }
            if report.sysman_deleted == Some(true) {
                successes.push("Deleted printer in SysMan".to_owned());
            }
            util::finish_report("delete printer", &successes, &report.errors, global)
        }

        PrintersCommand::SysmanCreate { printer } => {
            let current = util::find_printer(controller, &printer)?;
            if current.exists_in_sysman {
                return Err(CliError::Conflict {
                    resource_type: "printer".into(),
                    identifier: current.name.clone(),
                    system: "SysMan".into(),
                });
            }

            let result = controller
                .execute(CoreCommand::CreateInSysMan {
                    name: current.name.clone(),
                })
                .await?;
            let CommandResult::SysManCreated { printer: created } = &result else {
                return Err(unexpected(&result));
            };
            print_report(created, global);
            util::finish_report(
                "create printer in SysMan",
                &[format!(
                    "Created printer {} in SysMan with ID {}",
                    created.name, created.id
                )],
                &[],
                global,
            )
        }

        PrintersCommand::Targets { printer } => {
            let current = util::find_printer(controller, &printer)?;
            let targets: Vec<TargetRow> = controller
                .installation_targets(&current.name)
                .await?
                .into_iter()
                .map(|computer| TargetRow { computer })
                .collect();
            let out = output::render_list(
                &global.output,
                &targets,
                |t| TargetRow {
                    computer: t.computer.clone(),
                },
                |t| t.computer.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PrintersCommand::AddConfig {
            printer,
            configuration,
        } => {
            let result = controller
                .execute(CoreCommand::AddQueueConfiguration {
                    printer,
                    configuration: configuration.clone(),
                })
                .await?;
            let CommandResult::QueueConfigured { target, errors, .. } = &result else {
                return Err(unexpected(&result));
            };
            util::finish_report(
                "add queue configuration",
                &[format!("Added configuration {configuration} to queue {target}")],
                errors,
                global,
            )
        }

        PrintersCommand::RemoveConfig { printer } => {
            let result = controller
                .execute(CoreCommand::RemoveQueueConfiguration { printer })
                .await?;
            let CommandResult::QueueConfigured { target, errors, .. } = &result else {
                return Err(unexpected(&result));
            };
            util::finish_report(
                "remove queue configuration",
                &[format!("Removed configuration from queue {target}")],
                errors,
                global,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_configuration_flag_clears_configuration() {
        let args = UpdatePrinterArgs {
            printer: "SE_B1_F2_01".into(),
            name: None,
            ip: None,
            driver: None,
            region: None,
            configuration: None,
            no_configuration: true,
            description: None,
            location: None,
            sysman_description: None,
            sysman_location: None,
        };
        let request = update_request(args);
        assert_eq!(request.configuration.as_deref(), Some(""));
        assert_eq!(request.name, None);
    }
}
