use std::sync::Arc;

use portal_core::PortalConfig;

use crate::{JsonFileStore, MemoryStore, RecordStore, RecordStoreBackend, StoreResult};

/// Create the record store selected by configuration
pub async fn create_record_store(config: &PortalConfig) -> StoreResult<Arc<dyn RecordStore>> {
    match config.record_store_backend {
        RecordStoreBackend::Json => {
            let store = JsonFileStore::new(&config.record_store_path).await?;
            tracing::debug!(
                path = %config.record_store_path.display(),
                "Using JSON file record store"
            );
            Ok(Arc::new(store))
        }
        RecordStoreBackend::Memory => {
            tracing::debug!("Using in-memory record store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
