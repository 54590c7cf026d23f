//! HTTP client for the remote document file service.
//!
//! Provides the `FileTransfer` capability (upload a file under a category,
//! fetch a stored file by its remote id) and its reqwest implementation.
//! Every failure maps onto `TransferError` so callers can tell an
//! unreachable service from a rejection or a malformed response.

pub mod api;
pub mod transfer;

use std::time::Duration;

use anyhow::{Context, Result};
use portal_core::{PortalConfig, TransferError};
use reqwest::{Client, Response};

pub use transfer::FileTransfer;

/// Path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/api/files/upload";
/// Path prefix of the download endpoint; the remote file id follows.
pub const DOWNLOAD_PATH: &str = "/api/files/download";

const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client for the file service.
#[derive(Clone, Debug)]
pub struct HttpFileClient {
    client: Client,
    base_url: String,
}

impl HttpFileClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from portal configuration: FILE_SERVICE_URL and
    /// FILE_SERVICE_TIMEOUT_SECS.
    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        Self::new(config.file_service_url.clone(), config.file_service_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

/// Map a transport failure onto the error taxonomy.
pub(crate) fn network_error(err: reqwest::Error) -> TransferError {
    TransferError::NetworkUnavailable(err.to_string())
}

/// Turn a non-success response into `ServerRejected`, keeping a truncated
/// copy of the body for diagnostics.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, TransferError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(TransferError::ServerRejected {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}
