// ── Domain model ──
//
// Canonical types for both backends. Cirrato printers reference drivers
// and regions; SysMan printers are matched to them by name.

pub mod driver;
pub mod printer;
pub mod region;
pub mod sysman;

pub use driver::{Configuration, Driver};
pub use printer::Printer;
pub use region::Region;
pub use sysman::SysManPrinter;
