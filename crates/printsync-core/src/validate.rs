// ── Input validation ──
//
// Every check runs against the current directory snapshot before any
// external call is made. Field errors are collected rather than
// short-circuited so callers can show them all at once.

use std::fmt;

use serde::Serialize;

use crate::command::{CreatePrinterRequest, ResolvedUpdate};
use crate::error::CoreError;
use crate::model::{Printer, SysManPrinter};
use crate::store::Directory;

// ── Report ───────────────────────────────────────────────────────────

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Ip,
    Driver,
    Region,
    Configuration,
    Description,
    Location,
    SysmanDescription,
    SysmanLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All field errors found for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Record the error of `check`, if any.
    pub fn check(&mut self, field: Field, check: Result<(), String>) {
        if let Err(message) = check {
            self.errors.push(FieldError { field, message });
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message for `field`.
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoreError::ValidationFailed {
                message: self.to_string(),
            })
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&error.message)?;
        }
        Ok(())
    }
}

// ── Field checks ─────────────────────────────────────────────────────

/// Dotted-quad IPv4: four octets of one to three digits, each at most
/// 255. Leading zeros are accepted.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let octets: Vec<&str> = ip.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().is_ok_and(|v| v <= 255)
        })
}

/// The IP must be well formed and not used by any printer other than
/// `exclude_name`.
pub fn validate_ip<P: AsRef<Printer>>(
    ip: &str,
    printers: &[P],
    exclude_name: Option<&str>,
) -> Result<(), String> {
    if !is_valid_ipv4(ip) {
        return Err("Enter IP address in correct format.".into());
    }
    match printers.iter().map(|p| p.as_ref()).find(|p| p.ip == ip) {
        Some(other) if Some(other.name.as_str()) != exclude_name => {
            Err(format!("IP already in use by printer {}.", other.name))
        }
        _ => Ok(()),
    }
}

/// The name must be non-blank and unused in Cirrato (and in SysMan when
/// `check_sysman` is set). Keeping `exclude_name` is always allowed.
pub fn validate_name<P, S>(
    name: &str,
    printers: &[P],
    sysman: &[S],
    check_sysman: bool,
    exclude_name: Option<&str>,
) -> Result<(), String>
where
    P: AsRef<Printer>,
    S: AsRef<SysManPrinter>,
{
    if name.trim().is_empty() {
        return Err("Enter a valid printer name.".into());
    }
    if exclude_name == Some(name) {
        return Ok(());
    }
    if printers.iter().any(|p| p.as_ref().name == name) {
        return Err(format!("Printer {name} already exists in Cirrato."));
    }
    if check_sysman && sysman.iter().any(|s| s.as_ref().name == name) {
        return Err(format!("Printer {name} already exists in SysMan."));
    }
    Ok(())
}

/// Non-blank value, otherwise `message`.
pub fn require(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_owned())
    } else {
        Ok(())
    }
}

fn driver_and_configuration(
    report: &mut ValidationReport,
    directory: &Directory,
    driver: &str,
    configuration: &str,
) {
    let Some(found) = directory.driver_by_name(driver) else {
        report.check(
            Field::Driver,
            Err(format!("Driver {driver} does not exist in Cirrato.")),
        );
        return;
    };
    if !configuration.trim().is_empty() && found.configuration_by_name(configuration).is_none() {
        report.check(
            Field::Configuration,
            Err(format!(
                "Configuration {configuration} does not exist for driver {driver}."
            )),
        );
    }
}

fn region(report: &mut ValidationReport, directory: &Directory, region: &str) {
    if directory.region_by_name(region).is_none() {
        report.check(
            Field::Region,
            Err(format!("Region {region} does not exist in Cirrato.")),
        );
    }
}

// ── Request validation ───────────────────────────────────────────────

/// Validate a new printer against the directory.
pub fn validate_create(directory: &Directory, request: &CreatePrinterRequest) -> ValidationReport {
    let printers = directory.printers_snapshot();
    let sysman = directory.sysman_printers_snapshot();
    let mut report = ValidationReport::default();

    report.check(
        Field::Name,
        validate_name(
            &request.name,
            &printers,
            &sysman,
            request.create_in_sysman,
            None,
        ),
    );
    report.check(Field::Ip, validate_ip(&request.ip, &printers, None));
    report.check(
        Field::Description,
        require(&request.description, "Printer comment is required."),
    );
    report.check(
        Field::Location,
        require(&request.location, "Printer location is required."),
    );
    driver_and_configuration(
        &mut report,
        directory,
        &request.driver,
        request.configuration.as_deref().unwrap_or(""),
    );
    region(&mut report, directory, &request.region);

    report
}

/// Validate an edit of `current`. The printer's own name and IP never
/// count as conflicts.
pub fn validate_update(
    directory: &Directory,
    current: &Printer,
    update: &ResolvedUpdate,
) -> ValidationReport {
    let printers = directory.printers_snapshot();
    let sysman = directory.sysman_printers_snapshot();
    let exclude = Some(current.name.as_str());
    let mut report = ValidationReport::default();

    report.check(
        Field::Name,
        validate_name(&update.name, &printers, &sysman, true, exclude),
    );
    report.check(Field::Ip, validate_ip(&update.ip, &printers, exclude));
    report.check(
        Field::Description,
        require(&update.description, "Printer description is required."),
    );
    report.check(
        Field::Location,
        require(&update.location, "Printer location is required."),
    );
    if let Some(fields) = &update.sysman {
        report.check(
            Field::SysmanDescription,
            require(&fields.description, "Printer description is required."),
        );
        report.check(
            Field::SysmanLocation,
            require(&fields.location, "Printer location is required."),
        );
    }
    driver_and_configuration(&mut report, directory, &update.driver, &update.configuration);
    region(&mut report, directory, &update.region);

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::UpdatePrinterRequest;
    use crate::model::printer::fixtures::printer;
    use crate::model::{Driver, Region};

    fn sysman(name: &str) -> SysManPrinter {
        SysManPrinter {
            name: name.into(),
            id: 1,
            description: "d".into(),
            location: "l".into(),
            server: "Cirrato".into(),
            tag: String::new(),
            can_be_default: true,
            can_be_removed: false,
        }
    }

    fn directory() -> Directory {
        let dir = Directory::new();
        dir.replace_drivers(vec![Driver::new("HP Universal", "drv-1")]);
        dir.replace_regions(vec![Region {
            name: "Region1".into(),
            cirrato_id: 1,
        }]);
        dir.replace_printers(vec![
            printer("SE_B1_F2_01", "10.0.0.5"),
            printer("SE_B1_F2_02", "10.0.0.6"),
        ]);
        dir.replace_sysman_printers(vec![sysman("SE_B1_F2_09")]);
        dir
    }

    fn create_request(name: &str, ip: &str) -> CreatePrinterRequest {
        CreatePrinterRequest {
            name: name.into(),
            region: "Region1".into(),
            ip: ip.into(),
            driver: "HP Universal".into(),
            configuration: None,
            description: "Color".into(),
            location: "Floor 2".into(),
            create_in_sysman: true,
        }
    }

    #[test]
    fn ipv4_format() {
        assert!(is_valid_ipv4("10.0.0.1"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(is_valid_ipv4("010.001.0.09"));
        assert!(!is_valid_ipv4("256.0.0.1"));
        assert!(!is_valid_ipv4("10.0.0"));
        assert!(!is_valid_ipv4("10.0.0.1.2"));
        assert!(!is_valid_ipv4("10.0.0.0001"));
        assert!(!is_valid_ipv4("10.0..1"));
        assert!(!is_valid_ipv4("a.b.c.d"));
        assert!(!is_valid_ipv4("+1.0.0.1"));
    }

    #[test]
    fn ip_in_use_names_the_owner() {
        let printers = vec![printer("A", "10.0.0.5")];
        assert_eq!(
            validate_ip("10.0.0.5", &printers, None).unwrap_err(),
            "IP already in use by printer A."
        );
        assert!(validate_ip("10.0.0.5", &printers, Some("A")).is_ok());
        assert_eq!(
            validate_ip("10.0.0", &printers, None).unwrap_err(),
            "Enter IP address in correct format."
        );
    }

    #[test]
    fn name_checks_cirrato_then_sysman() {
        let printers = vec![printer("A", "10.0.0.1")];
        let sysman = vec![sysman("B")];

        assert_eq!(
            validate_name("  ", &printers, &sysman, true, None).unwrap_err(),
            "Enter a valid printer name."
        );
        assert_eq!(
            validate_name("A", &printers, &sysman, true, None).unwrap_err(),
            "Printer A already exists in Cirrato."
        );
        assert_eq!(
            validate_name("B", &printers, &sysman, true, None).unwrap_err(),
            "Printer B already exists in SysMan."
        );
        assert!(validate_name("B", &printers, &sysman, false, None).is_ok());
        assert!(validate_name("a", &printers, &sysman, true, None).is_ok());
    }

    #[test]
    fn duplicate_create_collects_field_errors() {
        let dir = directory();
        let mut request = create_request("SE_B1_F2_01", "10.0.0.5");
        request.description = String::new();

        let report = validate_create(&dir, &request);
        assert!(!report.is_valid());
        assert_eq!(
            report.message_for(Field::Name),
            Some("Printer SE_B1_F2_01 already exists in Cirrato.")
        );
        assert_eq!(
            report.message_for(Field::Ip),
            Some("IP already in use by printer SE_B1_F2_01.")
        );
        assert_eq!(
            report.message_for(Field::Description),
            Some("Printer comment is required.")
        );
        assert!(report.message_for(Field::Location).is_none());
    }

    #[test]
    fn create_checks_sysman_name_only_when_requested() {
        let dir = directory();
        let mut request = create_request("SE_B1_F2_09", "10.0.0.9");
        assert!(validate_create(&dir, &request).message_for(Field::Name).is_some());

        request.create_in_sysman = false;
        assert!(validate_create(&dir, &request).is_valid());
    }

    #[test]
    fn unknown_driver_region_and_configuration() {
        let dir = directory();
        let mut request = create_request("SE_B1_F2_03", "10.0.0.7");
        request.configuration = Some("Duplex".into());
        let report = validate_create(&dir, &request);
        assert_eq!(
            report.message_for(Field::Configuration),
            Some("Configuration Duplex does not exist for driver HP Universal.")
        );

        request.driver = "Nope".into();
        request.region = "Elsewhere".into();
        let report = validate_create(&dir, &request);
        assert!(report.message_for(Field::Driver).is_some());
        assert!(report.message_for(Field::Region).is_some());
        assert!(report.message_for(Field::Configuration).is_none());
    }

    #[test]
    fn self_edit_keeps_own_name_and_ip() {
        let dir = directory();
        let current = dir.printer_by_name("SE_B1_F2_01").unwrap();
        let resolved = UpdatePrinterRequest {
            location: Some("Floor 3".into()),
            ..UpdatePrinterRequest::new("SE_B1_F2_01")
        }
        .resolve(&current, None);

        assert!(validate_update(&dir, &current, &resolved).is_valid());
    }

    #[test]
    fn edit_cannot_take_another_printers_ip_or_name() {
        let dir = directory();
        let current = dir.printer_by_name("SE_B1_F2_01").unwrap();
        let resolved = UpdatePrinterRequest {
            name: Some("SE_B1_F2_02".into()),
            ip: Some("10.0.0.6".into()),
            description: Some(String::new()),
            ..UpdatePrinterRequest::new("SE_B1_F2_01")
        }
        .resolve(&current, None);

        let report = validate_update(&dir, &current, &resolved);
        assert_eq!(
            report.message_for(Field::Name),
            Some("Printer SE_B1_F2_02 already exists in Cirrato.")
        );
        assert_eq!(
            report.message_for(Field::Ip),
            Some("IP already in use by printer SE_B1_F2_02.")
        );
        assert_eq!(
            report.message_for(Field::Description),
            Some("Printer description is required.")
        );
    }

    #[test]
    fn report_converts_to_validation_error() {
        let mut report = ValidationReport::default();
        assert!(report.clone().into_result().is_ok());

        report.check(Field::Location, require("", "Printer location is required."));
        let err = report.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Printer location is required."
        );
    }
}
