// Hand-crafted async HTTP client for the SysMan printer inventory API.
//
// Base path: configured service URL, endpoints under api/Printer
// Auth: ambient (none) or optional HTTP basic credentials

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Optional HTTP basic credentials sent with every request.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the SysMan REST API.
pub struct SysManClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<BasicCredentials>,
}

impl SysManClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport config.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        credentials: Option<BasicCredentials>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        credentials: Option<BasicCredentials>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized service URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/Printer"`) onto the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(creds) => {
                builder.basic_auth(&creds.username, Some(creds.password.expose_secret()))
            }
            None => builder,
        }
    }

    /// Send a request and return the raw response.
    pub(crate) async fn send_raw(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> Result<reqwest::Response, Error> {
        debug!("{method} {url}");
        self.request(method, url)
            .send()
            .await
            .map_err(Error::Transport)
    }

    /// `GET` and deserialize a JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.send_raw(reqwest::Method::GET, url).await?;
        let body = Self::success_body(resp).await?;
        decode(&body)
    }

    /// Send a JSON body and return the raw response text of a 2xx reply.
    pub(crate) async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<String, Error> {
        debug!("{method} {url}");
        let resp = self
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::success_body(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Body text of a 2xx response; anything else becomes an error.
    pub(crate) async fn success_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "SysMan rejected the request credentials".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if status.is_success() {
            Ok(body)
        } else {
            let preview = preview(&body);
            Err(Error::SysMan {
                status: status.as_u16(),
                message: if preview.is_empty() {
                    status.to_string()
                } else {
                    preview
                },
            })
        }
    }
}

/// Deserialize a JSON body, keeping a preview for diagnostics.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

/// First 200 characters of a response body.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> SysManClient {
        SysManClient::with_client(base, reqwest::Client::new(), None).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("https://sysman.example.com/SysMan");
        assert_eq!(c.base_url().as_str(), "https://sysman.example.com/SysMan/");
    }

    #[test]
    fn api_url_appends_below_base_path() {
        let c = client("https://sysman.example.com/SysMan/");
        assert_eq!(
            c.api_url("api/Printer").unwrap().as_str(),
            "https://sysman.example.com/SysMan/api/Printer"
        );
    }
}
