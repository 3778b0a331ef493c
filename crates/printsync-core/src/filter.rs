// ── Printer filtering ──

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::Printer;

/// Printer field a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PrinterFilter {
    #[default]
    Name,
    Ip,
    Driver,
    Region,
    Description,
    Location,
}

impl PrinterFilter {
    fn field(self, printer: &Printer) -> &str {
        match self {
            Self::Name => &printer.name,
            Self::Ip => &printer.ip,
            Self::Driver => printer.driver_name(),
            Self::Region => printer.region_name(),
            Self::Description => &printer.description,
            Self::Location => &printer.location,
        }
    }

    /// Case-insensitive substring match on the selected field. An empty
    /// needle matches everything.
    pub fn matches(self, printer: &Printer, needle: &str) -> bool {
        self.field(printer)
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

/// Printers matching `needle` on `filter`, ordered by name.
pub fn filter_printers(
    printers: &[Arc<Printer>],
    filter: PrinterFilter,
    needle: &str,
) -> Vec<Arc<Printer>> {
    let mut matched: Vec<Arc<Printer>> = printers
        .iter()
        .filter(|p| filter.matches(p, needle))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.name.cmp(&b.name));
    matched
}
