// SysMan REST API client
//
// SysMan keeps the printer inventory that client computers install from.
// Printers managed through Cirrato are registered there by name.

mod client;
mod models;
mod printers;

pub use client::{BasicCredentials, SysManClient};
pub use models::{CIRRATO_SERVER, SysManPrinterPayload, SysManPrinterRecord};
pub use printers::{is_delete_success, parse_created_id};
