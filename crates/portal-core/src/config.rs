//! Configuration module
//!
//! Settings for the remote file service, the record store, local output
//! folders and staging validation. Everything is read from the environment
//! (with `.env` support) and falls back to named defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::store_types::RecordStoreBackend;

const FILE_SERVICE_URL: &str = "https://cp-upload-docs.onrender.com";
const FILE_SERVICE_TIMEOUT_SECS: u64 = 60;
const RECORD_STORE_PATH: &str = "./data/records";
const DOWNLOAD_DIR: &str = "./downloads";
const BOOKINGS_PATH: &str = "./fixtures/bookings.json";
const BYTES_PER_MB: u64 = 1024 * 1024;

fn megabytes_to_bytes(mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", mb))
}

/// Portal configuration
#[derive(Clone, Debug)]
pub struct PortalConfig {
    // Remote file service
    pub file_service_url: String,
    pub file_service_timeout_secs: u64,
    // Record store
    pub record_store_backend: RecordStoreBackend,
    pub record_store_path: PathBuf,
    // Local outputs and inputs
    pub download_dir: PathBuf,
    pub bookings_path: PathBuf,
    // Staging validation
    pub max_upload_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_UPLOAD_SIZE_MB: u64 = 10;

        let record_store_backend = env::var("RECORD_STORE_BACKEND")
            .unwrap_or_else(|_| RecordStoreBackend::Json.to_string())
            .parse()?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let allowed_extensions = env::var("UPLOAD_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "pdf,png,jpg,jpeg".to_string())
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = PortalConfig {
            file_service_url: env::var("FILE_SERVICE_URL")
                .unwrap_or_else(|_| FILE_SERVICE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            file_service_timeout_secs: env::var("FILE_SERVICE_TIMEOUT_SECS")
                .unwrap_or_else(|_| FILE_SERVICE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(FILE_SERVICE_TIMEOUT_SECS),
            record_store_backend,
            record_store_path: env::var("RECORD_STORE_PATH")
                .unwrap_or_else(|_| RECORD_STORE_PATH.to_string())
                .into(),
            download_dir: env::var("DOWNLOAD_DIR")
                .unwrap_or_else(|_| DOWNLOAD_DIR.to_string())
                .into(),
            bookings_path: env::var("BOOKINGS_PATH")
                .unwrap_or_else(|_| BOOKINGS_PATH.to_string())
                .into(),
            max_upload_size_bytes: megabytes_to_bytes(max_upload_size_mb)?,
            allowed_extensions,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.file_service_url.starts_with("http://")
            && !self.file_service_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "FILE_SERVICE_URL must be an http(s) URL, got {}",
                self.file_service_url
            ));
        }

        if self.file_service_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "FILE_SERVICE_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_MB must be greater than zero"
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOAD_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        Ok(())
    }

    pub fn file_service_timeout(&self) -> Duration {
        Duration::from_secs(self.file_service_timeout_secs)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            file_service_url: FILE_SERVICE_URL.to_string(),
            file_service_timeout_secs: FILE_SERVICE_TIMEOUT_SECS,
            record_store_backend: RecordStoreBackend::Json,
            record_store_path: PathBuf::from(RECORD_STORE_PATH),
            download_dir: PathBuf::from(DOWNLOAD_DIR),
            bookings_path: PathBuf::from(BOOKINGS_PATH),
            max_upload_size_bytes: 10 * BYTES_PER_MB,
            allowed_extensions: ["pdf", "png", "jpg", "jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
