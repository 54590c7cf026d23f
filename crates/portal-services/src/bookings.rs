use std::path::Path;

use anyhow::{Context, Result};
use portal_core::BookingDirectory;

/// Load the booking catalogue from a JSON array of bookings.
pub async fn load_bookings(path: &Path) -> Result<BookingDirectory> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read bookings from {}", path.display()))?;
    let directory = BookingDirectory::from_json(&json)
        .with_context(|| format!("Failed to parse bookings in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        bookings = directory.all().len(),
        "Bookings loaded"
    );
    Ok(directory)
}
