// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller processes them one at a time and routes each step to the
// PMC or SysMan.

pub mod requests;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{Printer, SysManPrinter};

pub use requests::{CreatePrinterRequest, ResolvedUpdate, SysManFields, UpdatePrinterRequest};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against Cirrato and SysMan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ── Printer lifecycle ────────────────────────────────────────────
    CreatePrinter(CreatePrinterRequest),
    UpdatePrinter(UpdatePrinterRequest),
    DeletePrinter {
        name: String,
    },
    /// Register an existing Cirrato printer in SysMan.
    CreateInSysMan {
        name: String,
    },

    // ── Queue configuration ──────────────────────────────────────────
    AddQueueConfiguration {
        printer: String,
        configuration: String,
    },
    RemoveQueueConfiguration {
        printer: String,
    },
}

impl Command {
    /// Short operation name used in logs and read-only errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreatePrinter(_) => "create printer",
            Self::UpdatePrinter(_) => "update printer",
            Self::DeletePrinter { .. } => "delete printer",
            Self::CreateInSysMan { .. } => "create printer in SysMan",
            Self::AddQueueConfiguration { .. } => "add queue configuration",
            Self::RemoveQueueConfiguration { .. } => "remove queue configuration",
        }
    }
}

/// Result of a successfully processed command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandResult {
    Created(CreateReport),
    Updated(UpdateReport),
    Deleted(DeleteReport),
    SysManCreated { printer: Arc<SysManPrinter> },
    QueueConfigured {
        target: String,
        message: String,
        /// Failures after the queue change itself succeeded.
        errors: Vec<String>,
    },
}

// ── Reports ──────────────────────────────────────────────────────────

/// Which backends ended up with the new printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStatus {
    Both,
    CirratoOnly,
    SysManOnly,
    Failed,
}

impl CreateStatus {
    pub fn from_results(cirrato: bool, sysman: bool) -> Self {
        match (cirrato, sysman) {
            (true, true) => Self::Both,
            (true, false) => Self::CirratoOnly,
            (false, true) => Self::SysManOnly,
            (false, false) => Self::Failed,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Both => "Created printer in Cirrato and SysMan!",
            Self::CirratoOnly => "Created printer in Cirrato only!",
            Self::SysManOnly => "Created printer in SysMan only!",
            Self::Failed => "Failed to create printer!",
        }
    }
}

impl fmt::Display for CreateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    pub status: CreateStatus,
    pub printer: Option<Arc<Printer>>,
    pub sysman_printer: Option<Arc<SysManPrinter>>,
    /// Backend failures, one line each.
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// `Field: old > new` lines for every changed value.
    pub changes: Vec<String>,
    pub cirrato_updated: bool,
    pub sysman_updated: bool,
    pub errors: Vec<String>,
    pub printer: Option<Arc<Printer>>,
}

impl UpdateReport {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteReport {
    pub name: String,
    pub cirrato_deleted: bool,
    /// `None` when the printer did not exist in SysMan.
    pub sysman_deleted: Option<bool>,
    pub errors: Vec<String>,
}
