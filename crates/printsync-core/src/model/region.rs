// ── Region domain type ──

use serde::{Deserialize, Serialize};

/// A Cirrato region (folder) printers live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Full path of the region.
    pub name: String,
    pub cirrato_id: i64,
}
