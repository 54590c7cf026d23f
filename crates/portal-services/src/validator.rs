use std::path::Path;

use portal_core::{PortalConfig, TransferError};

/// Checks a file before it is staged for upload.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(
            config.max_upload_size_bytes,
            config.allowed_extensions.clone(),
        )
    }

    pub fn validate_file_size(&self, file_name: &str, size: u64) -> Result<(), TransferError> {
        if size == 0 {
            return Err(TransferError::ValidationFailed(format!(
                "{} is empty",
                file_name
            )));
        }

        if size > self.max_file_size {
            return Err(TransferError::ValidationFailed(format!(
                "{} is too large: {} bytes (max: {} bytes)",
                file_name, size, self.max_file_size
            )));
        }

        Ok(())
    }

    pub fn validate_extension(&self, file_name: &str) -> Result<(), TransferError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| {
                TransferError::ValidationFailed(format!("{} has no file extension", file_name))
            })?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(TransferError::ValidationFailed(format!(
                "{} has unsupported type .{} (allowed: {})",
                file_name,
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        Ok(())
    }

    pub fn validate(&self, file_name: &str, size: u64) -> Result<(), TransferError> {
        if file_name.trim().is_empty() {
            return Err(TransferError::ValidationFailed(
                "File name is required".to_string(),
            ));
        }
        self.validate_extension(file_name)?;
        self.validate_file_size(file_name, size)
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::from_config(&PortalConfig::default())
    }
}
