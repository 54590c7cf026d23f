use std::path::{Path, PathBuf};

use async_trait::async_trait;
use portal_core::{DocumentRecord, RecordStoreBackend, StoreError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::keys::partition_file_name;
use crate::traits::{check_append, RecordStore, StoreResult};

/// Record store keeping one JSON file per booking under a base directory.
///
/// Each append rewrites the whole partition file through a temporary file
/// and a rename. Appends within one store are serialized; separate
/// processes writing the same partition are last-write-wins.
pub struct JsonFileStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Config(format!(
                "Failed to create record directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(JsonFileStore {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn partition_path(&self, booking_id: &str) -> StoreResult<PathBuf> {
        Ok(self.base_path.join(partition_file_name(booking_id)?))
    }

    async fn read_partition(&self, booking_id: &str, path: &Path) -> StoreResult<Vec<DocumentRecord>> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            key: booking_id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn write_partition(&self, path: &Path, records: &[DocumentRecord]) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(records).map_err(|e| {
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list_for(&self, booking_id: &str) -> StoreResult<Vec<DocumentRecord>> {
        let path = self.partition_path(booking_id)?;
        self.read_partition(booking_id, &path).await
    }

    async fn append(&self, booking_id: &str, record: DocumentRecord) -> StoreResult<()> {
        let path = self.partition_path(booking_id)?;
        let _guard = self.write_lock.lock().await;
        let start = std::time::Instant::now();

        let mut records = self.read_partition(booking_id, &path).await?;
        check_append(booking_id, &records, &record)?;

        let record_id = record.id;
        records.push(record);
        self.write_partition(&path, &records).await?;

        tracing::info!(
            path = %path.display(),
            booking_id = %booking_id,
            record_id = %record_id,
            record_count = records.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Record appended"
        );

        Ok(())
    }

    fn backend(&self) -> RecordStoreBackend {
        RecordStoreBackend::Json
    }
}
