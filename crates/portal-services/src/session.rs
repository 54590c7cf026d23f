//! Upload staging for one booking.
//!
//! A session collects files under a category while `Idle`, then `submit`
//! uploads them as one batch. Each file is uploaded by its own spawned task
//! and appended to the record store the moment it succeeds, so dropping the
//! `submit` future never loses an upload that went through.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use portal_api_client::FileTransfer;
use portal_core::{DocumentCategory, DocumentRecord, TransferError};
use portal_storage::RecordStore;
use tokio::task::JoinHandle;

use crate::validator::UploadValidator;

/// A file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub content: Bytes,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// The file a failed batch is reported against, with its error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub position: usize,
    pub file_name: String,
    pub error: TransferError,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    Completed,
    Failed(UploadFailure),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting => "submitting",
            SessionState::Completed => "completed",
            SessionState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Upload session is {0}, not idle")]
    NotIdle(&'static str),

    #[error("No staged file at position {0}")]
    NoSuchFile(usize),

    #[error(transparent)]
    Rejected(#[from] TransferError),
}

/// Outcome of one `submit`.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub attempted: usize,
    pub uploaded: Vec<DocumentRecord>,
    pub failures: Vec<UploadFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// "N of M uploaded"
    pub fn summary(&self) -> String {
        format!("{} of {} uploaded", self.uploaded.len(), self.attempted)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

pub struct UploadSession {
    booking_id: String,
    category: DocumentCategory,
    staged: Vec<StagedFile>,
    state: SessionState,
    transfer: Arc<dyn FileTransfer>,
    store: Arc<dyn RecordStore>,
    validator: UploadValidator,
}

impl UploadSession {
    pub fn new(
        booking_id: impl Into<String>,
        transfer: Arc<dyn FileTransfer>,
        store: Arc<dyn RecordStore>,
        validator: UploadValidator,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            category: DocumentCategory::default(),
            staged: Vec::new(),
            state: SessionState::Idle,
            transfer,
            store,
            validator,
        }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn category(&self) -> &DocumentCategory {
        &self.category
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => Ok(()),
            ref other => Err(SessionError::NotIdle(other.name())),
        }
    }

    pub fn select_category(&mut self, category: DocumentCategory) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.category = category;
        Ok(())
    }

    /// Add a file to the batch. Files with the same name are kept apart.
    pub fn stage_file(&mut self, file: StagedFile) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.validator.validate(&file.name, file.size())?;
        tracing::debug!(
            booking_id = %self.booking_id,
            file_name = %file.name,
            size_bytes = file.size(),
            "File staged"
        );
        self.staged.push(file);
        Ok(())
    }

    /// Read a file from disk and stage it under its file name.
    pub async fn stage_path(&mut self, path: &Path) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TransferError::ValidationFailed(format!("{} is not a file", path.display()))
            })?
            .to_string();
        let unreadable = |e: std::io::Error| {
            TransferError::ValidationFailed(format!("Cannot read {}: {}", path.display(), e))
        };

        let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(
                TransferError::ValidationFailed(format!("{} is not a file", path.display())).into(),
            );
        }
        self.validator.validate(&name, metadata.len())?;

        let content = tokio::fs::read(path).await.map_err(unreadable)?;
        self.stage_file(StagedFile::new(name, content))
    }

    pub fn unstage(&mut self, index: usize) -> Result<StagedFile, SessionError> {
        self.ensure_idle()?;
        if index >= self.staged.len() {
            return Err(SessionError::NoSuchFile(index));
        }
        Ok(self.staged.remove(index))
    }

    /// Upload every staged file. Successes are recorded even when other
    /// files in the batch fail; the session then reports the first failure
    /// in staging order and keeps the failed files staged.
    pub async fn submit(&mut self) -> Result<BatchReport, SessionError> {
        self.ensure_idle()?;
        if self.staged.is_empty() {
            return Err(TransferError::ValidationFailed(
                "Select at least one file to upload".to_string(),
            )
            .into());
        }

        self.state = SessionState::Submitting;
        let start = std::time::Instant::now();
        let files = std::mem::take(&mut self.staged);

        tracing::info!(
            booking_id = %self.booking_id,
            category = %self.category,
            files = files.len(),
            "Submitting upload batch"
        );

        let handles: Vec<JoinHandle<Result<DocumentRecord, TransferError>>> = files
            .iter()
            .map(|file| {
                tokio::spawn(upload_one(
                    self.transfer.clone(),
                    self.store.clone(),
                    self.booking_id.clone(),
                    self.category.clone(),
                    file.clone(),
                ))
            })
            .collect();

        let mut uploaded = Vec::new();
        let mut failures = Vec::new();
        let mut retry = Vec::new();
        for (position, (file, handle)) in files.into_iter().zip(handles).enumerate() {
            let outcome = handle.await.unwrap_or_else(|e| {
                Err(TransferError::SaveFailed(format!(
                    "Upload task ended abnormally: {}",
                    e
                )))
            });
            match outcome {
                Ok(record) => uploaded.push(record),
                Err(error) => {
                    failures.push(UploadFailure {
                        position,
                        file_name: file.name.clone(),
                        error,
                    });
                    retry.push(file);
                }
            }
        }

        let report = BatchReport {
            attempted: uploaded.len() + failures.len(),
            uploaded,
            failures,
        };

        self.state = match report.failures.first() {
            None => SessionState::Completed,
            Some(first) => {
                self.staged = retry;
                SessionState::Failed(first.clone())
            }
        };

        tracing::info!(
            booking_id = %self.booking_id,
            uploaded = report.uploaded.len(),
            failed = report.failures.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "{}",
            report.summary()
        );

        Ok(report)
    }

    /// Return a failed session to `Idle` with only the failed files staged.
    pub fn acknowledge_failure(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Failed(_) => {
                self.state = SessionState::Idle;
                Ok(())
            }
            ref other => Err(SessionError::NotIdle(other.name())),
        }
    }
}

async fn upload_one(
    transfer: Arc<dyn FileTransfer>,
    store: Arc<dyn RecordStore>,
    booking_id: String,
    category: DocumentCategory,
    file: StagedFile,
) -> Result<DocumentRecord, TransferError> {
    let size = file.size();
    let remote = match transfer.upload(&file.name, file.content, &category).await {
        Ok(remote) => remote,
        Err(e) => {
            tracing::warn!(
                booking_id = %booking_id,
                file_name = %file.name,
                error = %e,
                "Upload failed"
            );
            return Err(e);
        }
    };

    let record = DocumentRecord::from_upload(&booking_id, category, &file.name, size, remote);
    store
        .append(&booking_id, record.clone())
        .await
        .map_err(|e| {
            tracing::error!(
                booking_id = %booking_id,
                file_name = %file.name,
                error = %e,
                "Uploaded file could not be recorded"
            );
            TransferError::SaveFailed(e.to_string())
        })?;

    Ok(record)
}
