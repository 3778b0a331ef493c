// Mutating and session PMC commands.
//
// Each command reads only the first line of output and classifies it.

use secrecy::{ExposeSecret, SecretString};

use super::client::{PmcClient, argv};
use super::outcome::PmcOutcome;
use crate::error::Error;

// ── Request types ────────────────────────────────────────────────────

/// Arguments for `printer add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrinter {
    pub name: String,
    /// Full path of the region the printer is created in.
    pub region: String,
    pub ip: String,
    /// Driver name.
    pub driver: String,
    pub description: String,
    pub location: String,
}

/// Arguments for `printer modify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterUpdate {
    pub id: String,
    pub name: String,
    pub region: String,
    pub ip: String,
    pub driver: String,
    pub description: String,
    pub location: String,
}

/// How a queue's configuration binding changes during `queue modify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueConfigurationChange {
    /// Leave the bound configuration untouched.
    Keep,
    /// Bind `OS:configuration-id` pairs.
    Assign(Vec<String>),
    /// Unbind configurations for the listed operating systems.
    Remove(Vec<String>),
}

/// Arguments for `queue modify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueUpdate {
    pub name: String,
    pub region: String,
    pub driver: String,
    pub description: String,
    pub location: String,
    pub configuration: QueueConfigurationChange,
}

/// Queue target path: `{region}\{name}`.
pub fn queue_target(region: &str, name: &str) -> String {
    format!("{region}\\{name}")
}

// ── Commands ─────────────────────────────────────────────────────────

impl PmcClient {
    /// Probe whether the PMC session is logged in with `model list`.
    pub async fn check_login_status(&self) -> Result<PmcOutcome, Error> {
        let line = self.first_line(&argv(["model", "list"])).await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Log the PMC session in.
    pub async fn login(
        &self,
        domain: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<PmcOutcome, Error> {
        let args = argv([
            "login",
            "-d",
            domain,
            "-u",
            username,
            "-p",
            password.expose_secret(),
        ]);
        let line = self.first_line(&args).await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Create a printer and its queue. On success the outcome carries the
    /// new printer id, see [`PmcOutcome::created_id`].
    pub async fn create_printer(&self, printer: &NewPrinter) -> Result<PmcOutcome, Error> {
        let target = queue_target(&printer.region, &printer.name);
        let args = argv([
            "printer",
            "add",
            "--enforceuniquename",
            "y",
            "--enforceuniqueip",
            "y",
            "--target",
            &target,
            "--ip",
            &printer.ip,
            "--model",
            &printer.driver,
            "--location",
            &printer.location,
            "--comment",
            &printer.description,
        ]);
        let line = self.first_line(&args).await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Modify a printer's attributes.
    pub async fn modify_printer(&self, printer: &PrinterUpdate) -> Result<PmcOutcome, Error> {
        let args = argv([
            "printer",
            "modify",
            "--id",
            &printer.id,
            "--name",
            &printer.name,
            "--path",
            &printer.region,
            "--ip",
            &printer.ip,
            "--model",
            &printer.driver,
            "--comment",
            &printer.description,
            "--location",
            &printer.location,
        ]);
        let line = self.first_line(&args).await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Modify a printer's queue, optionally rebinding its configuration.
    pub async fn modify_queue(&self, queue: &QueueUpdate) -> Result<PmcOutcome, Error> {
        let target = queue_target(&queue.region, &queue.name);
        let mut args = argv([
            "queue",
            "modify",
            "--target",
            &target,
            "--model",
            &queue.driver,
            "--comment",
            &queue.description,
            "--location",
            &queue.location,
        ]);
        match &queue.configuration {
            QueueConfigurationChange::Keep => {}
            QueueConfigurationChange::Assign(pairs) => {
                args.push("--ac".into());
                args.push(pairs.join(","));
            }
            QueueConfigurationChange::Remove(systems) => {
                args.push("--rc".into());
                args.push(systems.join(","));
            }
        }
        let line = self.first_line(&args).await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Delete a printer by id.
    pub async fn delete_printer(&self, id: &str) -> Result<PmcOutcome, Error> {
        let line = self
            .first_line(&argv(["printer", "delete", "--id", id]))
            .await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Bind `OS:configuration-id` pairs to the queue at `target`.
    pub async fn add_queue_configuration(
        &self,
        target: &str,
        pairs: &[String],
    ) -> Result<PmcOutcome, Error> {
        let joined = pairs.join(",");
        let line = self
            .first_line(&argv(["queue", "modify", "--target", target, "-ac", &joined]))
            .await?;
        Ok(PmcOutcome::classify(&line))
    }

    /// Unbind configurations for the listed operating systems from the
    /// queue at `target`.
    pub async fn remove_queue_configuration(
        &self,
        target: &str,
        systems: &[String],
    ) -> Result<PmcOutcome, Error> {
        let joined = systems.join(",");
        let line = self
            .first_line(&argv(["queue", "modify", "--target", target, "-rc", &joined]))
            .await?;
        Ok(PmcOutcome::classify(&line))
    }
}
