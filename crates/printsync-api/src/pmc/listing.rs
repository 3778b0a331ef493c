// Verbose PMC listings.
//
// Listings that may contain printer or driver names are decoded as code
// page 850; the deployment listing only carries OS and model ids.

use tracing::debug;

use super::client::{PmcClient, argv};
use super::parse::parse_records;
use super::records::{
    ConfigurationRecord, DeploymentRecord, DriverRecord, PrinterRecord, QueueBinding, RegionRecord,
};
use crate::encoding::OutputEncoding;
use crate::error::Error;

impl PmcClient {
    /// List visible print drivers.
    ///
    /// `model list --verbose`
    pub async fn list_drivers(&self) -> Result<Vec<DriverRecord>, Error> {
        let lines = self
            .lines(&argv(["model", "list", "--verbose"]), OutputEncoding::Oem850)
            .await?;
        let drivers: Vec<DriverRecord> = parse_records(&lines)?;
        debug!(count = drivers.len(), "listed drivers");
        Ok(drivers)
    }

    /// List driver configurations.
    ///
    /// `configuration list --verbose`
    pub async fn list_configurations(&self) -> Result<Vec<ConfigurationRecord>, Error> {
        let lines = self
            .lines(
                &argv(["configuration", "list", "--verbose"]),
                OutputEncoding::Oem850,
            )
            .await?;
        let configs: Vec<ConfigurationRecord> = parse_records(&lines)?;
        debug!(count = configs.len(), "listed configurations");
        Ok(configs)
    }

    /// List driver deployments (OS per driver).
    ///
    /// `deployment list --verbose`
    pub async fn list_deployments(&self) -> Result<Vec<DeploymentRecord>, Error> {
        let lines = self
            .lines(
                &argv(["deployment", "list", "--verbose"]),
                OutputEncoding::Utf8,
            )
            .await?;
        let deployments: Vec<DeploymentRecord> = parse_records(&lines)?;
        debug!(count = deployments.len(), "listed deployments");
        Ok(deployments)
    }

    /// List every region below the root.
    ///
    /// `region list -p / --verbose`
    pub async fn list_regions(&self) -> Result<Vec<RegionRecord>, Error> {
        let lines = self
            .lines(
                &argv(["region", "list", "-p", "/", "--verbose"]),
                OutputEncoding::Oem850,
            )
            .await?;
        let regions: Vec<RegionRecord> = parse_records(&lines)?;
        debug!(count = regions.len(), "listed regions");
        Ok(regions)
    }

    /// List every printer in every region.
    ///
    /// `printer list -p * --verbose`
    pub async fn list_printers(&self) -> Result<Vec<PrinterRecord>, Error> {
        let lines = self
            .lines(
                &argv(["printer", "list", "-p", "*", "--verbose"]),
                OutputEncoding::Oem850,
            )
            .await?;
        let printers: Vec<PrinterRecord> = parse_records(&lines)?;
        debug!(count = printers.len(), "listed printers");
        Ok(printers)
    }

    /// List queue to configuration bindings.
    ///
    /// `queue list --path * --verbose`
    pub async fn list_queue_bindings(&self) -> Result<Vec<QueueBinding>, Error> {
        let lines = self
            .lines(
                &argv(["queue", "list", "--path", "*", "--verbose"]),
                OutputEncoding::Oem850,
            )
            .await?;
        let bindings: Vec<QueueBinding> = parse_records(&lines)?;
        debug!(count = bindings.len(), "listed queue bindings");
        Ok(bindings)
    }
}
