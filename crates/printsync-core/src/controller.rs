// ── Controller abstraction ──
//
// Full lifecycle management for one printsync session: reachability
// checks, PMC login state, access level, bulk loading into the
// Directory, and sequential command processing against both backends.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use printsync_api::pmc::{
    NewPrinter, PrinterUpdate, QueueConfigurationChange, QueueUpdate, queue_target,
};
use printsync_api::sysman::{CIRRATO_SERVER, is_delete_success, parse_created_id};
use printsync_api::transport::{TlsMode, TransportConfig};
use printsync_api::{PmcClient, PmcOutcome, ProcessRunner, SysManClient, TokioProcessRunner};
use secrecy::SecretString;

use crate::access::{AccessLevel, resolve_access};
use crate::command::{
    Command, CommandEnvelope, CommandResult, CreatePrinterRequest, CreateReport, CreateStatus,
    DeleteReport, UpdatePrinterRequest, UpdateReport,
};
use crate::config::{ControllerConfig, TlsVerification};
use crate::convert::{apply_queue_bindings, assemble_drivers, assemble_printers};
use crate::error::CoreError;
use crate::model::{Driver, Printer, Region, SysManPrinter};
use crate::reconcile::reconcile;
use crate::store::Directory;
use crate::validate::{validate_create, validate_update};

const COMMAND_CHANNEL_SIZE: usize = 16;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── LoginOutcome ─────────────────────────────────────────────────

/// Result of a PMC `login` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// The PMC refused the login. `message` is the user-facing text.
    Rejected { reason: String, message: String },
    /// Output that is neither a success nor an `[ERROR]` line.
    Unrecognized { output: String },
}

impl LoginOutcome {
    pub fn from_outcome(outcome: &PmcOutcome) -> Self {
        if outcome.is_login_successful() {
            return Self::Success;
        }
        match outcome {
            PmcOutcome::Error(reason) => {
                let message = match reason.as_str() {
                    "Login unsuccessful. Error code : Unauthorized" => {
                        "Login unsuccessful, likely incorrect credentials!".to_owned()
                    }
                    "Login unsuccessful. User has insufficient rights." => {
                        format!("{reason} Verify membership in AD group for API access!")
                    }
                    _ => reason.clone(),
                };
                Self::Rejected {
                    reason: reason.clone(),
                    message,
                }
            }
            PmcOutcome::NotLoggedIn => Self::Rejected {
                reason: outcome.to_string(),
                message: outcome.to_string(),
            },
            PmcOutcome::Ok(line) | PmcOutcome::Unrecognized(line) => Self::Unrecognized {
                output: line.clone(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Text to show the user.
    pub fn message(&self) -> String {
        match self {
            Self::Success => "Login successful.".into(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Unrecognized { output } => {
                format!("Could not categorize output from PMC. Message: {output}")
            }
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the directory, both
/// backend clients and the session's access level; all mutations go
/// through [`execute`](Self::execute) and are processed one at a time.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    directory: Arc<Directory>,
    connection_state: watch::Sender<ConnectionState>,
    access: watch::Sender<AccessLevel>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    runner: Arc<dyn ProcessRunner>,
    pmc: PmcClient,
    sysman: Mutex<Option<Arc<SysManClient>>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to check both backends and load
    /// the directory.
    pub fn new(config: ControllerConfig) -> Self {
        let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new(config.pmc_timeout));
        Self::with_runner(config, runner)
    }

    /// Like [`new`](Self::new), running every external process (PMC and
    /// group lookup) through `runner`.
    pub fn with_runner(config: ControllerConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (access, _) = watch::channel(AccessLevel::ReadOnly);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let pmc = PmcClient::new(config.pmc_path.clone(), Arc::clone(&runner));

        Self {
            inner: Arc::new(ControllerInner {
                config,
                directory: Arc::new(Directory::new()),
                connection_state,
                access,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                runner,
                pmc,
                sysman: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the session configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the underlying Directory.
    pub fn directory(&self) -> &Arc<Directory> {
        &self.inner.directory
    }

    /// Access level resolved during [`connect()`](Self::connect).
    pub fn access_level(&self) -> AccessLevel {
        *self.inner.access.borrow()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to both backends.
    ///
    /// Checks SysMan reachability and the PMC executable, resolves the
    /// access level, verifies the PMC login (logging in with configured
    /// credentials if needed), loads the directory and spawns the command
    /// processor.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner.connection_state.send_replace(ConnectionState::Connecting);

        match self.connect_inner().await {
            Ok(()) => {
                self.inner.connection_state.send_replace(ConnectionState::Connected);
                info!(
                    printers = self.inner.directory.printer_count(),
                    access = %self.access_level(),
                    "connected"
                );
                Ok(())
            }
            Err(e) => {
                self.inner.connection_state.send_replace(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn connect_inner(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;

        let transport = build_transport(config);
        let sysman = SysManClient::new(
            config.sysman_url.as_str(),
            &transport,
            config.sysman_credentials.clone(),
        )?;
        if let Err(e) = sysman.health_check().await {
            warn!(error = %e, url = %config.sysman_url, "SysMan health check failed");
            return Err(if e.is_auth_failure() {
                CoreError::from(e)
            } else {
                CoreError::SysManUnavailable {
                    url: config.sysman_url.to_string(),
                }
            });
        }
        *self.inner.sysman.lock().await = Some(Arc::new(sysman));

        if !self.inner.pmc.exists() {
            return Err(CoreError::PmcNotFound {
                path: config.pmc_path.display().to_string(),
            });
        }

        let access = resolve_access(&config.access_group, self.inner.runner.as_ref()).await;
        self.inner.access.send_replace(access);

        self.ensure_logged_in().await?;
        self.full_refresh().await?;

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }
        Ok(())
    }

    async fn ensure_logged_in(&self) -> Result<(), CoreError> {
        match self.inner.pmc.check_login_status().await? {
            PmcOutcome::NotLoggedIn => {
                let Some(creds) = self.inner.config.pmc_credentials.clone() else {
                    return Err(CoreError::LoginRequired);
                };
                debug!(user = %creds.username, "PMC session not logged in, logging in");
                let outcome = self
                    .login(&creds.domain, &creds.username, &creds.password)
                    .await?;
                if outcome.is_success() {
                    Ok(())
                } else {
                    Err(CoreError::LoginFailed {
                        message: outcome.message(),
                    })
                }
            }
            PmcOutcome::Error(message) => Err(CoreError::Pmc { message }),
            PmcOutcome::Ok(_) | PmcOutcome::Unrecognized(_) => Ok(()),
        }
    }

    /// Log the PMC in. The PMC keeps the session between invocations, so
    /// a successful login applies to every later call.
    pub async fn login(
        &self,
        domain: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, CoreError> {
        let outcome = self.inner.pmc.login(domain, username, password).await?;
        let login = LoginOutcome::from_outcome(&outcome);
        if login.is_success() {
            info!(user = username, "logged in to Cirrato PMC");
        } else {
            warn!(user = username, message = %login.message(), "PMC login failed");
        }
        Ok(login)
    }

    /// Disconnect: stop the command processor and drop the SysMan client.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        *self.inner.sysman.lock().await = None;
        self.inner.connection_state.send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    async fn sysman(&self) -> Result<Arc<SysManClient>, CoreError> {
        self.inner
            .sysman
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    // ── Data loading ─────────────────────────────────────────────

    /// Load everything from both backends and replace the directory.
    ///
    /// Listings run in dependency order. Any failure aborts before the
    /// directory is touched.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let pmc = &self.inner.pmc;
        let sysman = self.sysman().await?;

        let drivers = pmc.list_drivers().await?;
        let configurations = pmc.list_configurations().await?;
        let deployments = pmc.list_deployments().await?;
        let regions = pmc.list_regions().await?;
        let printer_records = pmc.list_printers().await?;
        let bindings = pmc.list_queue_bindings().await?;
        let sysman_records = sysman.list_all_printers().await?;

        let drivers: Vec<Arc<Driver>> = assemble_drivers(drivers, configurations, deployments)
            .into_iter()
            .map(Arc::new)
            .collect();
        let regions: Vec<Arc<Region>> = regions
            .into_iter()
            .map(|r| Arc::new(Region::from(r)))
            .collect();
        let mut printers = assemble_printers(printer_records, &drivers, &regions);
        apply_queue_bindings(&mut printers, &bindings, &drivers);
        let sysman_printers: Vec<SysManPrinter> =
            sysman_records.into_iter().map(SysManPrinter::from).collect();
        let printers = reconcile(&printers, &sysman_printers);

        let dir = &self.inner.directory;
        dir.replace_drivers(drivers.iter().map(|d| d.as_ref().clone()).collect());
        dir.replace_regions(regions.iter().map(|r| r.as_ref().clone()).collect());
        dir.replace_sysman_printers(sysman_printers);
        dir.replace_printers(printers);

        debug!(
            drivers = dir.driver_count(),
            regions = dir.region_count(),
            printers = dir.printer_count(),
            sysman_printers = dir.sysman_printer_count(),
            "data refresh complete"
        );
        Ok(())
    }

    /// Re-fetch Cirrato printers, queue bindings and SysMan printers
    /// against the loaded drivers and regions, then reconcile.
    async fn refresh_printers(&self) -> Result<(), CoreError> {
        let pmc = &self.inner.pmc;
        let sysman = self.sysman().await?;

        let printer_records = pmc.list_printers().await?;
        let bindings = pmc.list_queue_bindings().await?;
        let sysman_records = sysman.list_all_printers().await?;

        let dir = &self.inner.directory;
        let drivers = dir.drivers_snapshot();
        let regions = dir.regions_snapshot();
        let mut printers = assemble_printers(printer_records, &drivers, &regions);
        apply_queue_bindings(&mut printers, &bindings, &drivers);
        let sysman_printers: Vec<SysManPrinter> =
            sysman_records.into_iter().map(SysManPrinter::from).collect();

        let printers = reconcile(&printers, &sysman_printers);
        dir.replace_sysman_printers(sysman_printers);
        dir.replace_printers(printers);
        Ok(())
    }

    /// Recompute SysMan links from the current snapshots.
    fn reconcile_directory(&self) {
        let dir = &self.inner.directory;
        let printers = reconcile(&dir.printers_snapshot(), &dir.sysman_printers_snapshot());
        dir.replace_printers(printers);
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result. Read-only sessions are
    /// rejected before anything is sent.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::ControllerDisconnected);
        }
        if self.access_level().is_read_only() {
            return Err(CoreError::ReadOnly {
                operation: cmd.operation().into(),
            });
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ControllerDisconnected)?;

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Subscribe to printer list changes.
    pub fn printers(&self) -> watch::Receiver<Arc<Vec<Arc<Printer>>>> {
        self.inner.directory.subscribe_printers()
    }

    // ── Snapshot accessors (delegate to Directory) ───────────────

    pub fn printers_snapshot(&self) -> Arc<Vec<Arc<Printer>>> {
        self.inner.directory.printers_snapshot()
    }

    pub fn sysman_printers_snapshot(&self) -> Arc<Vec<Arc<SysManPrinter>>> {
        self.inner.directory.sysman_printers_snapshot()
    }

    pub fn drivers_snapshot(&self) -> Arc<Vec<Arc<Driver>>> {
        self.inner.directory.drivers_snapshot()
    }

    pub fn regions_snapshot(&self) -> Arc<Vec<Arc<Region>>> {
        self.inner.directory.regions_snapshot()
    }

    // ── SysMan queries ───────────────────────────────────────────

    /// Computers that have the printer installed, according to SysMan.
    pub async fn installation_targets(&self, printer_name: &str) -> Result<Vec<String>, CoreError> {
        let sysman = self.sysman().await?;
        Ok(sysman.installation_targets(printer_name).await?)
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Process commands from the mpsc channel one at a time.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let operation = envelope.command.operation();
                let result = route_command(&controller, envelope.command).await;
                if let Err(ref e) = result {
                    warn!(operation, error = %e, "command failed");
                }
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    match cmd {
        Command::CreatePrinter(req) => create_printer(controller, req)
            .await
            .map(CommandResult::Created),
        Command::UpdatePrinter(req) => update_printer(controller, req)
            .await
            .map(CommandResult::Updated),
        Command::DeletePrinter { name } => delete_printer(controller, &name)
            .await
            .map(CommandResult::Deleted),
        Command::CreateInSysMan { name } => {
            let printer = create_in_sysman(controller, &name).await?;
            Ok(CommandResult::SysManCreated { printer })
        }
        Command::AddQueueConfiguration {
            printer,
            configuration,
        } => add_queue_configuration(controller, &printer, &configuration).await,
        Command::RemoveQueueConfiguration { printer } => {
            remove_queue_configuration(controller, &printer).await
        }
    }
}

fn sysman_printer(name: &str, id: i64, description: &str, location: &str) -> SysManPrinter {
    SysManPrinter {
        name: name.to_owned(),
        id,
        description: description.to_owned(),
        location: location.to_owned(),
        server: CIRRATO_SERVER.into(),
        tag: String::new(),
        can_be_default: true,
        can_be_removed: false,
    }
}

fn printer_by_name(dir: &Directory, name: &str) -> Result<Arc<Printer>, CoreError> {
    dir.printer_by_name(name)
        .ok_or_else(|| CoreError::PrinterNotFound {
            identifier: name.to_owned(),
        })
}

fn driver_by_name(dir: &Directory, name: &str) -> Result<Arc<Driver>, CoreError> {
    dir.driver_by_name(name).ok_or_else(|| CoreError::DriverNotFound {
        name: name.to_owned(),
    })
}

fn region_by_name(dir: &Directory, name: &str) -> Result<Arc<Region>, CoreError> {
    dir.region_by_name(name).ok_or_else(|| CoreError::RegionNotFound {
        name: name.to_owned(),
    })
}

/// `os:configuration-id` pairs for `configuration` on `driver`.
fn configuration_pairs(driver: &Driver, configuration: &str) -> Result<Vec<String>, CoreError> {
    let found = driver
        .configuration_by_name(configuration)
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!(
                "Configuration {configuration} does not exist for driver {}.",
                driver.name
            ),
        })?;
    Ok(driver.configuration_pairs(&found.cirrato_id))
}

// ── Create ───────────────────────────────────────────────────────

async fn create_printer(
    controller: &Controller,
    req: CreatePrinterRequest,
) -> Result<CreateReport, CoreError> {
    let dir = controller.directory();
    validate_create(dir, &req).into_result()?;
    let driver = driver_by_name(dir, &req.driver)?;
    let region = region_by_name(dir, &req.region)?;
    let configuration = req
        .configuration
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut errors = Vec::new();
    let pmc = &controller.inner.pmc;

    let outcome = pmc
        .create_printer(&NewPrinter {
            name: req.name.clone(),
            region: region.name.clone(),
            ip: req.ip.clone(),
            driver: driver.name.clone(),
            description: req.description.clone(),
            location: req.location.clone(),
        })
        .await?;

    let mut cirrato_ok = outcome.is_ok();
    if cirrato_ok {
        dir.add_printer(Printer {
            name: req.name.clone(),
            cirrato_id: outcome.created_id().unwrap_or_default(),
            sysman_id: String::new(),
            driver: Some(Arc::clone(&driver)),
            region: Some(region.as_ref().clone()),
            description: req.description.clone(),
            location: req.location.clone(),
            ip: req.ip.clone(),
            exists_in_sysman: false,
            configuration: configuration.map(str::to_owned),
        });
        info!(printer = %req.name, "created printer in Cirrato");

        if let Some(configuration) = configuration {
            let target = queue_target(&region.name, &req.name);
            let queue_error = match configuration_pairs(&driver, configuration) {
                Ok(pairs) => match pmc.add_queue_configuration(&target, &pairs).await {
                    Ok(queue) if queue.is_ok() => None,
                    Ok(queue) => Some(queue.to_string()),
                    Err(e) => Some(e.to_string()),
                },
                Err(e) => Some(e.to_string()),
            };
            if let Some(detail) = queue_error {
                cirrato_ok = false;
                errors.push(format!(
                    "Failed to add configuration {configuration} for operating systems {} to printer queue {} in Cirrato! {detail}",
                    driver.deployed_os.join(", "),
                    req.name
                ));
            }
        }
    } else {
        errors.push(format!("Failed to create printer in Cirrato! {outcome}"));
    }

    let mut sysman_created = None;
    if req.create_in_sysman {
        let created = match controller.sysman().await {
            Ok(sysman) => sysman
                .create_printer(&req.name, &req.description, &req.location)
                .await
                .map_err(CoreError::from),
            Err(e) => Err(e),
        };
        match created {
            Ok(body) => match parse_created_id(&body) {
                Some(id) => {
                    let created = dir.add_sysman_printer(sysman_printer(
                        &req.name,
                        id,
                        &req.description,
                        &req.location,
                    ));
                    info!(printer = %req.name, id, "created printer in SysMan");
                    sysman_created = Some(created);
                }
                None => errors.push(format!(
                    "Failed to create printer in SysMan! SysMan response: {body}"
                )),
            },
            Err(e) => errors.push(format!("Failed to create printer in SysMan! {e}")),
        }
    }

    controller.reconcile_directory();

    let status = CreateStatus::from_results(cirrato_ok, sysman_created.is_some());
    for error in &errors {
        warn!(printer = %req.name, "{error}");
    }
    Ok(CreateReport {
        status,
        printer: dir.printer_by_name(&req.name),
        sysman_printer: sysman_created,
        errors,
    })
}

/// Register an existing Cirrato printer in SysMan with its Cirrato
/// description and location.
async fn create_in_sysman(
    controller: &Controller,
    name: &str,
) -> Result<Arc<SysManPrinter>, CoreError> {
    let dir = controller.directory();
    let printer = printer_by_name(dir, name)?;
    if dir.sysman_printer_by_name(name).is_some() {
        return Err(CoreError::ValidationFailed {
            message: format!("Printer {name} already exists in SysMan."),
        });
    }

    let sysman = controller.sysman().await?;
    let body = sysman
        .create_printer(&printer.name, &printer.description, &printer.location)
        .await?;
    let Some(id) = parse_created_id(&body) else {
        return Err(CoreError::OperationFailed {
            message: format!("Failed to create printer in SysMan! SysMan response: {body}"),
        });
    };

    let created = dir.add_sysman_printer(sysman_printer(
        &printer.name,
        id,
        &printer.description,
        &printer.location,
    ));
    controller.reconcile_directory();
    info!(printer = name, id, "created printer in SysMan");
    Ok(created)
}

// ── Update ───────────────────────────────────────────────────────

async fn update_printer(
    controller: &Controller,
    req: UpdatePrinterRequest,
) -> Result<UpdateReport, CoreError> {
    let dir = controller.directory();
    let current = printer_by_name(dir, &req.printer)?;
    let existing = dir.sysman_printer_by_name(&current.name);
    let resolved = req.resolve(&current, existing.as_deref());
    validate_update(dir, &current, &resolved).into_result()?;

    let changes = resolved.changes(&current, existing.as_deref());
    let mut report = UpdateReport {
        changes,
        cirrato_updated: false,
        sysman_updated: false,
        errors: Vec::new(),
        printer: Some(Arc::clone(&current)),
    };
    if report.is_noop() {
        return Ok(report);
    }

    if resolved.cirrato_modified(&current) {
        let driver = driver_by_name(dir, &resolved.driver)?;
        let region = region_by_name(dir, &resolved.region)?;
        let pmc = &controller.inner.pmc;

        let outcome = pmc
            .modify_printer(&PrinterUpdate {
                id: current.cirrato_id.clone(),
                name: resolved.name.clone(),
                region: region.name.clone(),
                ip: resolved.ip.clone(),
                driver: driver.name.clone(),
                description: resolved.description.clone(),
                location: resolved.location.clone(),
            })
            .await?;

        if outcome.is_ok() {
            info!(printer = %current.name, "updated printer in Cirrato");
            report.cirrato_updated = true;

            let configuration = if resolved.configuration.trim().is_empty() {
                if driver.deployed_os.is_empty() {
                    QueueConfigurationChange::Keep
                } else {
                    QueueConfigurationChange::Remove(driver.deployed_os.clone())
                }
            } else if resolved.configuration == current.configuration_name() {
                QueueConfigurationChange::Keep
            } else {
                match configuration_pairs(&driver, &resolved.configuration) {
                    Ok(pairs) => QueueConfigurationChange::Assign(pairs),
                    Err(e) => {
                        report.errors.push(format!(
                            "Modified printer, but could not modify queue in Cirrato! {e}"
                        ));
                        QueueConfigurationChange::Keep
                    }
                }
            };

            let queue = pmc
                .modify_queue(&QueueUpdate {
                    name: resolved.name.clone(),
                    region: region.name.clone(),
                    driver: driver.name.clone(),
                    description: resolved.description.clone(),
                    location: resolved.location.clone(),
                    configuration,
                })
                .await;
            let queue_error = match queue {
                Ok(queue) if queue.is_ok() => None,
                Ok(queue) => Some(queue.to_string()),
                Err(e) => Some(e.to_string()),
            };
            if let Some(detail) = queue_error {
                report.errors.push(format!(
                    "Modified printer, but could not modify queue in Cirrato! {detail}"
                ));
            }
        } else {
            report
                .errors
                .push(format!("Failed to modify printer in Cirrato! {outcome}"));
        }
    }

    if let (Some(existing), Some(fields)) = (existing.as_deref(), resolved.sysman.as_ref()) {
        if resolved.sysman_modified(existing) {
            let modified = match controller.sysman().await {
                Ok(sysman) => sysman
                    .modify_printer(
                        existing.id,
                        &resolved.name,
                        &fields.description,
                        &fields.location,
                    )
                    .await
                    .map_err(CoreError::from),
                Err(e) => Err(e),
            };
            match modified {
                Ok(_) => {
                    info!(printer = %existing.name, id = existing.id, "updated printer in SysMan");
                    report.sysman_updated = true;
                }
                Err(e) => report
                    .errors
                    .push(format!("Failed to modify printer in SysMan! {e}")),
            }
        }
    }

    refresh_after_mutation(controller, &mut report.errors).await;
    for error in &report.errors {
        warn!(printer = %current.name, "{error}");
    }

    report.printer = dir
        .printer_by_name(&resolved.name)
        .or_else(|| dir.printer_by_name(&current.name));
    Ok(report)
}

// ── Delete ───────────────────────────────────────────────────────

async fn delete_printer(controller: &Controller, name: &str) -> Result<DeleteReport, CoreError> {
    let dir = controller.directory();
    let current = printer_by_name(dir, name)?;
    let mut errors = Vec::new();

    let cirrato_deleted = match controller
        .inner
        .pmc
        .delete_printer(&current.cirrato_id)
        .await
    {
        Ok(outcome) if outcome.is_ok() => {
            info!(printer = name, "deleted printer in Cirrato");
            true
        }
        Ok(outcome) => {
            errors.push(format!("Failed to delete printer in Cirrato! {outcome}"));
            false
        }
        Err(e) => {
            errors.push(format!("Failed to delete printer in Cirrato! {e}"));
            false
        }
    };

    let mut sysman_deleted = None;
    if let Some(existing) = dir.sysman_printer_by_name(name) {
        let result = match controller.sysman().await {
            Ok(sysman) => sysman
                .delete_printer(existing.id)
                .await
                .map_err(CoreError::from),
            Err(e) => Err(e),
        };
        let deleted = match result {
            Ok(body) if is_delete_success(&body) => {
                info!(printer = name, id = existing.id, "deleted printer in SysMan");
                true
            }
            Ok(body) => {
                errors.push(format!("Failed to delete printer in SysMan! {body}"));
                false
            }
            Err(e) => {
                errors.push(format!("Failed to delete printer in SysMan! {e}"));
                false
            }
        };
        sysman_deleted = Some(deleted);
    }

    refresh_after_mutation(controller, &mut errors).await;
    for error in &errors {
        warn!(printer = name, "{error}");
    }

    Ok(DeleteReport {
        name: name.to_owned(),
        cirrato_deleted,
        sysman_deleted,
        errors,
    })
}

// ── Queue configuration ──────────────────────────────────────────

async fn add_queue_configuration(
    controller: &Controller,
    name: &str,
    configuration: &str,
) -> Result<CommandResult, CoreError> {
    let dir = controller.directory();
    let printer = printer_by_name(dir, name)?;
    let driver = driver_by_name(dir, printer.driver_name())?;
    let pairs = configuration_pairs(&driver, configuration)?;
    let target = printer.queue_target();

    let outcome = controller
        .inner
        .pmc
        .add_queue_configuration(&target, &pairs)
        .await?;
    if !outcome.is_ok() {
        return Err(CoreError::OperationFailed {
            message: format!(
                "Failed to add configuration {configuration} for operating systems {} to printer queue {name} in Cirrato! {outcome}",
                driver.deployed_os.join(", ")
            ),
        });
    }

    info!(queue = %target, configuration, "added queue configuration");
    let mut errors = Vec::new();
    refresh_after_mutation(controller, &mut errors).await;
    Ok(CommandResult::QueueConfigured {
        target,
        message: outcome.to_string(),
        errors,
    })
}

async fn remove_queue_configuration(
    controller: &Controller,
    name: &str,
) -> Result<CommandResult, CoreError> {
    let dir = controller.directory();
    let printer = printer_by_name(dir, name)?;
    let driver = driver_by_name(dir, printer.driver_name())?;
    let target = printer.queue_target();

    let outcome = controller
        .inner
        .pmc
        .remove_queue_configuration(&target, &driver.deployed_os)
        .await?;
    if !outcome.is_ok() {
        return Err(CoreError::OperationFailed {
            message: format!(
                "Failed to remove configurations for operating systems {} from printer queue {name} in Cirrato! {outcome}",
                driver.deployed_os.join(", ")
            ),
        });
    }

    info!(queue = %target, "removed queue configuration");
    let mut errors = Vec::new();
    refresh_after_mutation(controller, &mut errors).await;
    Ok(CommandResult::QueueConfigured {
        target,
        message: outcome.to_string(),
        errors,
    })
}

// ── Helpers ──────────────────────────────────────────────────────

/// Re-fetch both printer lists after a mutation. The mutation has already
/// happened, so a failed reload is reported next to its results.
async fn refresh_after_mutation(controller: &Controller, errors: &mut Vec<String>) {
    if let Err(e) = controller.refresh_printers().await {
        errors.push(format!("Failed to reload printers! {e}"));
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_login_hints_at_credentials() {
        let outcome =
            PmcOutcome::classify("[ERROR] Login unsuccessful. Error code : Unauthorized");
        let login = LoginOutcome::from_outcome(&outcome);
        assert!(!login.is_success());
        assert_eq!(
            login.message(),
            "Login unsuccessful, likely incorrect credentials!"
        );
    }

    #[test]
    fn insufficient_rights_hints_at_group_membership() {
        let outcome =
            PmcOutcome::classify("[ERROR] Login unsuccessful. User has insufficient rights.");
        assert_eq!(
            LoginOutcome::from_outcome(&outcome).message(),
            "Login unsuccessful. User has insufficient rights. Verify membership in AD group for API access!"
        );
    }

    #[test]
    fn other_errors_pass_through_cleaned() {
        let outcome = PmcOutcome::classify("[ERROR]   Server unavailable ");
        assert_eq!(
            LoginOutcome::from_outcome(&outcome).message(),
            "Server unavailable"
        );
    }

    #[test]
    fn success_and_unrecognized_output() {
        assert!(LoginOutcome::from_outcome(&PmcOutcome::classify("[OK] Login successful.")).is_success());
        let login = LoginOutcome::from_outcome(&PmcOutcome::classify("Welcome"));
        assert_eq!(
            login.message(),
            "Could not categorize output from PMC. Message: Welcome"
        );
    }
}
