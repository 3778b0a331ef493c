// ── SysMan printer domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A printer registered in SysMan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysManPrinter {
    pub name: String,
    pub id: i64,
    pub description: String,
    pub location: String,
    pub server: String,
    pub tag: String,
    pub can_be_default: bool,
    pub can_be_removed: bool,
}

impl fmt::Display for SysManPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Printer Name: {}", self.name)?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Server: {}", self.server)?;
        writeln!(f, "Tag: {}", self.tag)?;
        writeln!(f, "Can be default: {}", self.can_be_default)?;
        writeln!(f, "Can be removed: {}", self.can_be_removed)
    }
}
