// ── Printer domain type ──

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::driver::Driver;
use super::region::Region;

/// A printer as known to Cirrato, annotated with its SysMan counterpart.
///
/// `driver` and `region` are `None` when the listing referenced an id the
/// directory does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub name: String,
    pub cirrato_id: String,
    /// Id of the SysMan printer with the same name, empty if there is none.
    pub sysman_id: String,
    pub driver: Option<Arc<Driver>>,
    pub region: Option<Region>,
    pub description: String,
    pub location: String,
    pub ip: String,
    pub exists_in_sysman: bool,
    /// Name of the configuration bound to the printer's queue.
    pub configuration: Option<String>,
}

impl Printer {
    pub fn driver_name(&self) -> &str {
        self.driver.as_deref().map_or("", |d| d.name.as_str())
    }

    pub fn region_name(&self) -> &str {
        self.region.as_ref().map_or("", |r| r.name.as_str())
    }

    pub fn configuration_name(&self) -> &str {
        self.configuration.as_deref().unwrap_or("")
    }

    /// Queue target path `{region}\{name}`.
    pub fn queue_target(&self) -> String {
        printsync_api::pmc::queue_target(self.region_name(), &self.name)
    }

    /// SysMan id as a number, when the printer exists there.
    pub fn sysman_id(&self) -> Option<i64> {
        if self.exists_in_sysman {
            self.sysman_id.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Printer Name: {}", self.name)?;
        writeln!(f, "Cirrato ID: {}", self.cirrato_id)?;
        writeln!(f, "Cirrato Printer Region: {}", self.region_name())?;
        writeln!(f, "Exists in SysMan: {}", self.exists_in_sysman)?;
        writeln!(f, "SysMan ID: {}", self.sysman_id)?;
        writeln!(f, "IP Address: {}", self.ip)?;
        writeln!(f, "Print Driver: {}", self.driver_name())?;
        writeln!(f, "Configuration: {}", self.configuration_name())?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Location: {}", self.location)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::printer;

    #[test]
    fn detail_block_lists_labelled_fields() {
        let text = printer("SE_B1_F2_01", "10.0.0.5").to_string();
        assert!(text.starts_with("Printer Name: SE_B1_F2_01\n"));
        assert!(text.contains("Cirrato Printer Region: Region1\n"));
        assert!(text.contains("Print Driver: HP Universal\n"));
        assert!(text.ends_with("Location: loc\n"));
    }

    #[test]
    fn queue_target_uses_region_path() {
        assert_eq!(
            printer("SE_B1_F2_01", "10.0.0.5").queue_target(),
            "Region1\\SE_B1_F2_01"
        );
    }

    #[test]
    fn sysman_id_requires_existence_flag() {
        let mut p = printer("P", "10.0.0.1");
        p.sysman_id = "12".into();
        assert_eq!(p.sysman_id(), None);
        p.exists_in_sysman = true;
        assert_eq!(p.sysman_id(), Some(12));
    }
}
