//! File service operations for `HttpFileClient`.
//!
//! The upload response is only trusted for its identifier. The service has
//! been seen to name it `fileId`, `file_id`, `id` or `_id`; all are checked
//! in that order and a response carrying none of them is rejected.

use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use portal_core::{DocumentCategory, RemoteFile, TransferError};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::{ensure_success, network_error, FileTransfer, HttpFileClient, DOWNLOAD_PATH, UPLOAD_PATH};

const FILE_ID_ALIASES: [&str; 4] = ["fileId", "file_id", "id", "_id"];
const FILE_URL_ALIASES: [&str; 3] = ["fileUrl", "file_url", "url"];

#[async_trait]
impl FileTransfer for HttpFileClient {
    async fn upload(
        &self,
        file_name: &str,
        content: Bytes,
        category: &DocumentCategory,
    ) -> Result<RemoteFile, TransferError> {
        let url = self.build_url(UPLOAD_PATH);
        let size = content.len();
        let start = Instant::now();

        let form = Form::new()
            .part(
                "file",
                Part::bytes(content.to_vec()).file_name(file_name.to_string()),
            )
            .text("DocumentType", category.label().to_string());

        let response = self
            .client()
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let response = ensure_success(response).await?;

        let body = response.bytes().await.map_err(network_error)?;
        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            TransferError::ContractViolation(format!("Upload response is not JSON: {}", e))
        })?;
        let remote = parse_upload_response(&value)?;

        tracing::info!(
            url = %url,
            status = status.as_u16(),
            file_name = %file_name,
            category = %category,
            remote_file_id = %remote.file_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File uploaded"
        );

        Ok(remote)
    }

    async fn fetch(&self, remote_file_id: &str) -> Result<Bytes, TransferError> {
        if remote_file_id.trim().is_empty() {
            return Err(TransferError::ValidationFailed(
                "Remote file id is empty".to_string(),
            ));
        }

        let url = self.build_url(&format!(
            "{}/{}",
            DOWNLOAD_PATH,
            urlencoding::encode(remote_file_id)
        ));
        let start = Instant::now();

        let response = self
            .client()
            .get(&url)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let response = ensure_success(response).await?;
        let data = response.bytes().await.map_err(network_error)?;

        tracing::info!(
            url = %url,
            status = status.as_u16(),
            remote_file_id = %remote_file_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File fetched"
        );

        Ok(data)
    }
}

/// Extract the remote identifier (and optional URL) from an upload response.
pub fn parse_upload_response(value: &Value) -> Result<RemoteFile, TransferError> {
    let object = value.as_object().ok_or_else(|| {
        TransferError::ContractViolation("Upload response is not a JSON object".to_string())
    })?;

    let file_id = FILE_ID_ALIASES
        .iter()
        .find_map(|alias| object.get(*alias).and_then(identifier))
        .ok_or_else(|| {
            TransferError::ContractViolation(format!(
                "Upload response carries no file identifier (checked {})",
                FILE_ID_ALIASES.join(", ")
            ))
        })?;

    let file_url = FILE_URL_ALIASES
        .iter()
        .find_map(|alias| object.get(*alias).and_then(Value::as_str))
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string);

    Ok(RemoteFile { file_id, file_url })
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
