// Cirrato PMC (Print Management Console) client
//
// The PMC is a command-line tool with no machine-readable API. Listings
// are scraped line by line from its verbose output and mutating commands
// report success or failure on their first output line.

mod client;
mod commands;
mod listing;
mod outcome;
mod parse;
mod records;

pub use client::PmcClient;
pub use commands::{NewPrinter, PrinterUpdate, QueueConfigurationChange, QueueUpdate, queue_target};
pub use outcome::{LOGIN_SUCCESSFUL, NOT_LOGGED_IN, PmcOutcome};
pub use parse::{ERROR_MARKER, OK_MARKER};
pub use records::{
    ConfigurationRecord, DeploymentRecord, DriverRecord, PrinterRecord, QueueBinding, RegionRecord,
};
