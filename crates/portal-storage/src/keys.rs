//! Partition key validation and naming.

use portal_core::StoreError;

use crate::traits::StoreResult;

/// Validate a booking id for use as a partition key.
pub fn validate_partition_key(booking_id: &str) -> StoreResult<()> {
    if booking_id.trim().is_empty() {
        return Err(StoreError::InvalidKey("Partition key is empty".to_string()));
    }

    if booking_id.contains("..")
        || booking_id.contains('/')
        || booking_id.contains('\\')
        || booking_id.chars().any(char::is_control)
    {
        return Err(StoreError::InvalidKey(format!(
            "Partition key contains invalid characters: {:?}",
            booking_id
        )));
    }

    Ok(())
}

/// File name holding a booking's records: `uploaded-files_{booking_id}.json`.
pub fn partition_file_name(booking_id: &str) -> StoreResult<String> {
    validate_partition_key(booking_id)?;
    Ok(format!("uploaded-files_{}.json", booking_id))
}
