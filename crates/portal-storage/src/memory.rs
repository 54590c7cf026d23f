use std::collections::HashMap;

use async_trait::async_trait;
use portal_core::{DocumentRecord, RecordStoreBackend};
use tokio::sync::RwLock;

use crate::keys::validate_partition_key;
use crate::traits::{check_append, RecordStore, StoreResult};

/// In-process record store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<String, Vec<DocumentRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_for(&self, booking_id: &str) -> StoreResult<Vec<DocumentRecord>> {
        validate_partition_key(booking_id)?;
        let partitions = self.partitions.read().await;
        Ok(partitions.get(booking_id).cloned().unwrap_or_default())
    }

    async fn append(&self, booking_id: &str, record: DocumentRecord) -> StoreResult<()> {
        validate_partition_key(booking_id)?;
        let mut partitions = self.partitions.write().await;
        let records = partitions.entry(booking_id.to_string()).or_default();
        check_append(booking_id, &records[..], &record)?;

        tracing::debug!(
            booking_id = %booking_id,
            record_id = %record.id,
            record_count = records.len() + 1,
            "Record appended"
        );
        records.push(record);
        Ok(())
    }

    fn backend(&self) -> RecordStoreBackend {
        RecordStoreBackend::Memory
    }
}
