//! Plumbing shared by the `portal` binary: tracing setup, JSON output and
//! the wiring of store, file service client and sink from configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use portal_api_client::{FileTransfer, HttpFileClient};
use portal_core::format::{format_file_size, format_upload_date};
use portal_core::{Booking, BookingDirectory, DocumentRecord, ErrorMetadata, LogLevel, PortalConfig};
use portal_documents::LocalFileSink;
use portal_services::{load_bookings, BookingDocuments, UploadValidator};
use portal_storage::{create_record_store, RecordStore};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Log an error at its own level and wrap it with the message meant for
/// the user.
pub fn user_error<E>(err: E) -> anyhow::Error
where
    E: ErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code = err.error_code(), error = %err, "Action failed"),
        LogLevel::Warn => tracing::warn!(code = err.error_code(), error = %err, "Action failed"),
        LogLevel::Error => tracing::error!(code = err.error_code(), error = %err, "Action failed"),
    }

    let mut message = err.client_message();
    if let Some(action) = err.suggested_action() {
        if !message.contains(action) {
            message = format!("{} {}", message, action);
        }
    }
    anyhow::Error::new(err).context(message)
}

/// Uploaded documents as a fixed-width table.
pub fn record_table(records: &[DocumentRecord]) -> String {
    let mut out = format!(
        "{:<36}  {:<28}  {:<30}  {:>10}  {:<11}  {}\n",
        "ID", "CATEGORY", "NAME", "SIZE", "UPLOADED", "REMOTE"
    );
    for record in records {
        let remote = if record.is_retrievable() {
            "yes"
        } else {
            "missing"
        };
        out.push_str(&format!(
            "{:<36}  {:<28}  {:<30}  {:>10}  {:<11}  {}\n",
            record.id,
            truncate_string(record.category.label(), 28),
            truncate_string(&record.display_name, 30),
            format_file_size(record.size_bytes),
            format_upload_date(&record.uploaded_at),
            remote
        ));
    }
    out
}

/// Everything a command needs, built once from configuration.
pub struct Portal {
    config: PortalConfig,
    bookings: BookingDirectory,
    store: Arc<dyn RecordStore>,
    transfer: Arc<dyn FileTransfer>,
    sink: Arc<LocalFileSink>,
}

impl Portal {
    pub async fn from_config(config: PortalConfig) -> Result<Self> {
        let bookings = load_bookings(&config.bookings_path).await?;
        let store = create_record_store(&config)
            .await
            .map_err(user_error)
            .context("Failed to open record store")?;
        let transfer: Arc<dyn FileTransfer> = Arc::new(
            HttpFileClient::from_config(&config).context("Failed to create file service client")?,
        );
        let sink = Arc::new(LocalFileSink::new(config.download_dir.clone()));

        tracing::debug!(
            backend = %store.backend(),
            file_service_url = %config.file_service_url,
            download_dir = %config.download_dir.display(),
            "Portal ready"
        );

        Ok(Self {
            config,
            bookings,
            store,
            transfer,
            sink,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn sink(&self) -> &LocalFileSink {
        &self.sink
    }

    pub fn booking(&self, booking_id: &str) -> Result<&Booking> {
        self.bookings
            .get(booking_id)
            .with_context(|| format!("Booking {} not found", booking_id))
    }

    pub fn documents(&self, booking_id: &str) -> Result<BookingDocuments> {
        let booking = self.booking(booking_id)?;
        Ok(BookingDocuments::new(
            booking.booking_id.clone(),
            self.store.clone(),
            self.transfer.clone(),
            self.sink.clone(),
            UploadValidator::from_config(&self.config),
        ))
    }
}
