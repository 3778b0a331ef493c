// printsync-core: Printer directory and session layer between printsync-api and the CLI.

pub mod access;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod filter;
pub mod model;
pub mod naming;
pub mod reconcile;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access::AccessLevel;
pub use command::requests::*;
pub use command::{
    Command, CommandResult, CreateReport, CreateStatus, DeleteReport, UpdateReport,
};
pub use config::{BasicCredentials, ControllerConfig, PmcCredentials, TlsVerification};
pub use controller::{ConnectionState, Controller, LoginOutcome};
pub use error::CoreError;
pub use filter::{PrinterFilter, filter_printers};
pub use naming::NameSuggestion;
pub use reconcile::reconcile;
pub use store::Directory;
pub use validate::{Field, FieldError, ValidationReport};

// Re-export model types at the crate root for ergonomics.
pub use model::{Configuration, Driver, Printer, Region, SysManPrinter};
