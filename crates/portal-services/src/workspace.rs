use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use portal_api_client::FileTransfer;
use portal_core::{Checklist, DocumentRecord, StoreError, TransferError};
use portal_documents::FileSink;
use portal_storage::RecordStore;
use uuid::Uuid;

use crate::session::UploadSession;
use crate::validator::UploadValidator;

/// Everything the portal does with one booking's uploaded documents.
///
/// Holds the collaborators explicitly; there is no shared global state
/// between bookings.
#[derive(Clone)]
pub struct BookingDocuments {
    booking_id: String,
    store: Arc<dyn RecordStore>,
    transfer: Arc<dyn FileTransfer>,
    sink: Arc<dyn FileSink>,
    validator: UploadValidator,
}

impl BookingDocuments {
    pub fn new(
        booking_id: impl Into<String>,
        store: Arc<dyn RecordStore>,
        transfer: Arc<dyn FileTransfer>,
        sink: Arc<dyn FileSink>,
        validator: UploadValidator,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            store,
            transfer,
            sink,
            validator,
        }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    /// Uploaded documents, oldest first.
    pub async fn list(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        self.store.list_for(&self.booking_id).await
    }

    pub async fn record(&self, record_id: Uuid) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.list().await?.into_iter().find(|r| r.id == record_id))
    }

    /// Evaluated from the store on every call.
    pub async fn checklist(&self) -> Result<Checklist, StoreError> {
        let records = self.list().await?;
        Ok(Checklist::evaluate(&records))
    }

    /// A fresh staging session for this booking.
    pub fn upload_session(&self) -> UploadSession {
        UploadSession::new(
            self.booking_id.clone(),
            self.transfer.clone(),
            self.store.clone(),
            self.validator.clone(),
        )
    }

    /// Fetch the file and save it under the record's display name.
    pub async fn download(&self, record: &DocumentRecord) -> Result<PathBuf, TransferError> {
        let start = std::time::Instant::now();
        let content = self.fetch(record).await?;
        let path = self.sink.save(&record.display_name, &content).await?;

        tracing::info!(
            booking_id = %self.booking_id,
            record_id = %record.id,
            path = %path.display(),
            size_bytes = content.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document downloaded"
        );
        Ok(path)
    }

    /// Open a local copy of the file for viewing. The copy is remembered on
    /// the record as its retrieval handle and reused while it still exists.
    pub async fn view(&self, record: &mut DocumentRecord) -> Result<PathBuf, TransferError> {
        let start = std::time::Instant::now();
        self.remote_id(record)?;
        if let Some(handle) = &record.retrieval_handle {
            if tokio::fs::try_exists(handle).await.unwrap_or(false) {
                return Ok(handle.clone());
            }
        }

        let content = self.fetch(record).await?;
        let path = self.sink.open(&record.display_name, &content).await?;
        record.retrieval_handle = Some(path.clone());

        tracing::info!(
            booking_id = %self.booking_id,
            record_id = %record.id,
            path = %path.display(),
            size_bytes = content.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document opened for viewing"
        );
        Ok(path)
    }

    async fn fetch(&self, record: &DocumentRecord) -> Result<Bytes, TransferError> {
        let remote_id = self.remote_id(record)?;
        self.transfer.fetch(remote_id).await
    }

    fn remote_id<'a>(&self, record: &'a DocumentRecord) -> Result<&'a str, TransferError> {
        match record.remote_file_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => {
                tracing::debug!(
                    booking_id = %self.booking_id,
                    record_id = %record.id,
                    "Record has no remote file id"
                );
                Err(TransferError::MissingRemoteReference {
                    record_id: record.id,
                    display_name: record.display_name.clone(),
                })
            }
        }
    }
}
