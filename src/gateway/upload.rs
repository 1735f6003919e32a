//! Uploading code to the gateway.

use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::config::ToolConfig;
use crate::error::{GetlitError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Stores code and returns its content hash.
pub trait Uploader {
    /// Upload `code`, returning the content identifier.
    fn upload(&self, code: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    res: UploadResult,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    status: u16,
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UploadData {
    #[serde(default)]
    ipfs_hash: String,
}

/// Uploader posting `{ "code": ... }` to the deployer endpoint.
///
/// # Example
///
/// ```no_run
/// use getlit::gateway::{HttpUploader, Uploader};
///
/// let uploader = HttpUploader::new("https://lit-actions-deployer.herokuapp.com/").unwrap();
/// let hash = uploader.upload("console.log('hi')").unwrap();
/// println!("https://ipfs.litgateway.com/ipfs/{}", hash);
/// ```
pub struct HttpUploader {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpUploader {
    /// Create an uploader for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create an uploader with a custom request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("getlit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create an uploader for the configured gateway.
    pub fn from_config(config: &ToolConfig) -> Result<Self> {
        Self::new(config.gateway.upload_url.clone())
    }

    fn post(&self, code: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .with_context(|| format!("Failed to reach {}", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} from {}", response.status(), self.url));
        }

        let envelope: UploadEnvelope = response
            .json()
            .with_context(|| format!("Unexpected response from {}", self.url))?;

        if envelope.res.status != 200 {
            return Err(anyhow!("gateway answered with status {}", envelope.res.status));
        }

        envelope
            .res
            .data
            .map(|d| d.ipfs_hash)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow!("gateway response carries no IpfsHash"))
    }
}

impl Uploader for HttpUploader {
    fn upload(&self, code: &str) -> Result<String> {
        tracing::debug!("Uploading {} bytes to {}", code.len(), self.url);
        self.post(code).map_err(|e| GetlitError::UploadFailed {
            message: format!("{:#}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn uploader(server: &MockServer) -> HttpUploader {
        HttpUploader::with_timeout(server.url("/"), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn upload_returns_hash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/")
                .json_body(serde_json::json!({ "code": "console.log(1);" }));
            then.status(200)
                .json_body(serde_json::json!({ "res": { "status": 200, "data": { "IpfsHash": "QmHash" } } }));
        });

        let hash = uploader(&server).upload("console.log(1);").unwrap();

        mock.assert();
        assert_eq!(hash, "QmHash");
    }

    #[test]
    fn http_error_is_upload_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(503).body("Service Unavailable");
        });

        let err = uploader(&server).upload("x").unwrap_err();

        assert!(matches!(err, GetlitError::UploadFailed { .. }));
        assert!(err.to_string().contains("503"), "unexpected: {}", err);
    }

    #[test]
    fn gateway_status_other_than_200_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .json_body(serde_json::json!({ "res": { "status": 500, "data": {} } }));
        });

        let err = uploader(&server).upload("x").unwrap_err();
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn malformed_response_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("<html>oops</html>");
        });

        let err = uploader(&server).upload("x").unwrap_err();
        assert!(err.to_string().contains("Unexpected response"));
    }
}
