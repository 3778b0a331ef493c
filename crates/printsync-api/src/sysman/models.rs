// SysMan wire types.
//
// SysMan serializes with inconsistent casing across versions, so every
// field accepts both the camelCase and PascalCase spelling.

use serde::{Deserialize, Serialize};

/// Server value SysMan stores for printers managed through Cirrato.
pub const CIRRATO_SERVER: &str = "Cirrato";

/// A printer as returned by `GET /api/Printer/Active`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SysManPrinterRecord {
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Id", alias = "ID")]
    pub id: i64,
    #[serde(alias = "Description", default)]
    pub description: Option<String>,
    #[serde(alias = "Location", default)]
    pub location: Option<String>,
    #[serde(alias = "Server", default)]
    pub server: Option<String>,
    #[serde(alias = "Tag", default)]
    pub tag: Option<String>,
    #[serde(rename = "canBeDefault", alias = "CanBeDefault", default)]
    pub can_be_default: bool,
    #[serde(rename = "canBeRemoved", alias = "CanBeRemoved", default)]
    pub can_be_removed: bool,
}

/// Request body for `POST /api/Printer` and `PUT /api/Printer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SysManPrinterPayload {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Server")]
    pub server: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "canBeDefault")]
    pub can_be_default: bool,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl SysManPrinterPayload {
    /// Body for a new Cirrato-backed printer.
    pub fn new(name: &str, description: &str, location: &str) -> Self {
        Self {
            id: None,
            name: name.to_owned(),
            server: CIRRATO_SERVER.to_owned(),
            description: description.to_owned(),
            location: location.to_owned(),
            can_be_default: true,
            is_active: true,
        }
    }

    /// Body for updating the printer with the given id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Request body for `DELETE /api/Printer`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct DeletePrinterBody {
    #[serde(rename = "Id")]
    pub id: i64,
}

/// One row of `GET /api/Printer/GetTargetsWithPrinterInstalled`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct InstallationTarget {
    #[serde(rename = "displayName", alias = "DisplayName", default)]
    pub display_name: Option<String>,
}
