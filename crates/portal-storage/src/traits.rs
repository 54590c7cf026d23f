use async_trait::async_trait;
use portal_core::{DocumentRecord, RecordStoreBackend, StoreError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-booking record persistence.
///
/// A partition lists records in the order they were appended. Record ids
/// are unique within a partition.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of a booking, oldest first. An unknown booking has an
    /// empty partition.
    async fn list_for(&self, booking_id: &str) -> StoreResult<Vec<DocumentRecord>>;

    /// Append one record to the end of a booking's partition.
    async fn append(&self, booking_id: &str, record: DocumentRecord) -> StoreResult<()>;

    fn backend(&self) -> RecordStoreBackend;
}

/// Checks shared by every backend before a record joins a partition.
pub(crate) fn check_append(
    key: &str,
    existing: &[DocumentRecord],
    record: &DocumentRecord,
) -> StoreResult<()> {
    if record.booking_id != key {
        return Err(StoreError::BookingMismatch {
            key: key.to_string(),
            found: record.booking_id.clone(),
        });
    }

    if existing.iter().any(|r| r.id == record.id) {
        return Err(StoreError::DuplicateRecord {
            key: key.to_string(),
            id: record.id,
        });
    }

    Ok(())
}
