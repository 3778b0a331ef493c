// SysMan printer endpoints.

use std::collections::HashSet;

use tracing::debug;

use super::client::SysManClient;
use super::models::{
    DeletePrinterBody, InstallationTarget, SysManPrinterPayload, SysManPrinterRecord,
};
use crate::error::Error;

const PRINTER_PATH: &str = "api/Printer";
const ACTIVE_PATH: &str = "api/Printer/Active";
const TARGETS_PATH: &str = "api/Printer/GetTargetsWithPrinterInstalled";

/// Page size large enough to fetch every active printer in one request.
const ACTIVE_TAKE: &str = "10000";

impl SysManClient {
    /// Verify the service answers `GET {base}` with HTTP 200.
    pub async fn health_check(&self) -> Result<(), Error> {
        let resp = self
            .send_raw(reqwest::Method::GET, self.base_url().clone())
            .await?;
        let status = resp.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else if status == reqwest::StatusCode::UNAUTHORIZED {
            Err(Error::Authentication {
                message: "SysMan rejected the request credentials".into(),
            })
        } else {
            Err(Error::SysMan {
                status: status.as_u16(),
                message: format!("unexpected status from {}", self.base_url()),
            })
        }
    }

    /// Fetch every active printer.
    ///
    /// The response is an envelope object whose first array-valued
    /// property holds the printers.
    pub async fn list_all_printers(&self) -> Result<Vec<SysManPrinterRecord>, Error> {
        let mut url = self.api_url(ACTIVE_PATH)?;
        url.query_pairs_mut()
            .append_pair("name", "%")
            .append_pair("take", ACTIVE_TAKE)
            .append_pair("skip", "0");

        let envelope: serde_json::Map<String, serde_json::Value> = self.get(url).await?;
        let Some(items) = envelope.into_iter().find_map(|(_, v)| match v {
            serde_json::Value::Array(items) => Some(items),
            _ => None,
        }) else {
            return Err(Error::Deserialization {
                message: "printer envelope holds no array property".into(),
                body: String::new(),
            });
        };

        let printers: Vec<SysManPrinterRecord> =
            serde_json::from_value(serde_json::Value::Array(items)).map_err(|e| {
                Error::Deserialization {
                    message: format!("invalid printer entry: {e}"),
                    body: String::new(),
                }
            })?;
        debug!(count = printers.len(), "listed SysMan printers");
        Ok(printers)
    }

    /// Create a printer. Returns the raw response body, which holds the new
    /// printer id on success (see [`parse_created_id`]).
    pub async fn create_printer(
        &self,
        name: &str,
        description: &str,
        location: &str,
    ) -> Result<String, Error> {
        let url = self.api_url(PRINTER_PATH)?;
        let body = SysManPrinterPayload::new(name, description, location);
        self.send_json(reqwest::Method::POST, url, &body).await
    }

    /// Update an existing printer. Returns the raw response body.
    pub async fn modify_printer(
        &self,
        id: i64,
        name: &str,
        description: &str,
        location: &str,
    ) -> Result<String, Error> {
        let url = self.api_url(PRINTER_PATH)?;
        let body = SysManPrinterPayload::new(name, description, location).with_id(id);
        self.send_json(reqwest::Method::PUT, url, &body).await
    }

    /// Delete a printer by id. Returns the raw response body, which is empty
    /// on success.
    pub async fn delete_printer(&self, id: i64) -> Result<String, Error> {
        let url = self.api_url(PRINTER_PATH)?;
        self.send_json(reqwest::Method::DELETE, url, &DeletePrinterBody { id })
            .await
    }

    /// Names of the computers that have the printer installed: blank names
    /// dropped, duplicates removed keeping the first occurrence.
    pub async fn installation_targets(&self, printer_name: &str) -> Result<Vec<String>, Error> {
        let mut url = self.api_url(TARGETS_PATH)?;
        url.query_pairs_mut().append_pair("printerName", printer_name);

        let rows: Vec<InstallationTarget> = self.get(url).await?;
        let mut seen = HashSet::new();
        let targets = rows
            .into_iter()
            .filter_map(|row| row.display_name)
            .filter(|name| !name.trim().is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Ok(targets)
    }
}

/// Id of a created printer: the whole body parsed as an integer.
pub fn parse_created_id(body: &str) -> Option<i64> {
    body.trim().parse().ok()
}

/// Whether a delete response signals success.
pub fn is_delete_success(body: &str) -> bool {
    body.is_empty()
}
