//! Error types module
//!
//! Failures of the document subsystem are split by where they originate:
//! `TransferError` for anything touching the remote file service or staging
//! validation, `StoreError` for the persisted record partitions. Both
//! describe themselves to the presentation layer through `ErrorMetadata`.

use std::io;

use uuid::Uuid;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a rejected upload
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for presenting an error to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same action can succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Human-readable message shown to the user
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failures of upload, download and view actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("File service unreachable: {0}")]
    NetworkUnavailable(String),

    #[error("File service rejected the request with status {status}: {body}")]
    ServerRejected { status: u16, body: String },

    #[error("File service response violated the contract: {0}")]
    ContractViolation(String),

    #[error("Document {display_name} ({record_id}) has no remote file id")]
    MissingRemoteReference { record_id: Uuid, display_name: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to save file locally: {0}")]
    SaveFailed(String),
}

impl TransferError {
    /// Status code carried by a server rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransferError::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<io::Error> for TransferError {
    fn from(err: io::Error) -> Self {
        TransferError::SaveFailed(err.to_string())
    }
}

impl ErrorMetadata for TransferError {
    fn error_code(&self) -> &'static str {
        match self {
            TransferError::NetworkUnavailable(_) => "NETWORK_UNAVAILABLE",
            TransferError::ServerRejected { .. } => "SERVER_REJECTED",
            TransferError::ContractViolation(_) => "CONTRACT_VIOLATION",
            TransferError::MissingRemoteReference { .. } => "MISSING_REMOTE_REFERENCE",
            TransferError::ValidationFailed(_) => "VALIDATION_FAILED",
            TransferError::SaveFailed(_) => "SAVE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            TransferError::NetworkUnavailable(_) | TransferError::SaveFailed(_) => true,
            TransferError::ServerRejected { status, .. } => *status >= 500 || *status == 429,
            TransferError::ContractViolation(_)
            | TransferError::MissingRemoteReference { .. }
            | TransferError::ValidationFailed(_) => false,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            TransferError::NetworkUnavailable(_) => Some("Check your connection and try again"),
            TransferError::ServerRejected { .. } => Some("Retry after a short delay"),
            TransferError::ContractViolation(_) => Some("Contact support if this error persists"),
            TransferError::MissingRemoteReference { .. } => Some("Please re-upload the file"),
            TransferError::ValidationFailed(_) => Some("Check the selected files and try again"),
            TransferError::SaveFailed(_) => Some("Check the download folder and try again"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            TransferError::NetworkUnavailable(_) => {
                "The document service could not be reached.".to_string()
            }
            TransferError::ServerRejected { status, .. } => {
                format!("The document service rejected the request (status {}).", status)
            }
            TransferError::ContractViolation(_) => {
                "The document service returned an unexpected response.".to_string()
            }
            TransferError::MissingRemoteReference { .. } => {
                "File ID not available. Please re-upload the file.".to_string()
            }
            TransferError::ValidationFailed(reason) => reason.clone(),
            TransferError::SaveFailed(_) => "The file could not be saved.".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            TransferError::ValidationFailed(_) | TransferError::MissingRemoteReference { .. } => {
                LogLevel::Debug
            }
            TransferError::NetworkUnavailable(_) | TransferError::ServerRejected { .. } => {
                LogLevel::Warn
            }
            TransferError::ContractViolation(_) | TransferError::SaveFailed(_) => LogLevel::Error,
        }
    }
}

/// Failures of the persisted record partitions.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid partition key: {0}")]
    InvalidKey(String),

    #[error("Partition {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Duplicate record id {id} in partition {key}")]
    DuplicateRecord { key: String, id: Uuid },

    #[error("Record for booking {found} appended to partition {key}")]
    BookingMismatch { key: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorMetadata for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::InvalidKey(_) => "INVALID_PARTITION_KEY",
            StoreError::Corrupt { .. } => "CORRUPT_PARTITION",
            StoreError::DuplicateRecord { .. } => "DUPLICATE_RECORD",
            StoreError::BookingMismatch { .. } => "BOOKING_MISMATCH",
            StoreError::Io(_) => "STORE_IO_ERROR",
            StoreError::Config(_) => "STORE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            StoreError::Io(_) => Some("Retry after a short delay"),
            StoreError::Corrupt { .. } => Some("Remove or repair the partition file"),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            StoreError::Corrupt { .. } => "Saved documents could not be read.".to_string(),
            _ => "Saved documents could not be updated.".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StoreError::InvalidKey(_)
            | StoreError::DuplicateRecord { .. }
            | StoreError::BookingMismatch { .. } => LogLevel::Debug,
            StoreError::Io(_) | StoreError::Corrupt { .. } | StoreError::Config(_) => {
                LogLevel::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_codes_are_distinct() {
        let errors = [
            TransferError::NetworkUnavailable("refused".to_string()),
            TransferError::ServerRejected {
                status: 500,
                body: String::new(),
            },
            TransferError::ContractViolation("no id".to_string()),
            TransferError::MissingRemoteReference {
                record_id: Uuid::nil(),
                display_name: "pan.pdf".to_string(),
            },
            TransferError::ValidationFailed("empty".to_string()),
            TransferError::SaveFailed("disk full".to_string()),
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_missing_reference_asks_for_reupload() {
        let err = TransferError::MissingRemoteReference {
            record_id: Uuid::nil(),
            display_name: "aadhar.png".to_string(),
        };
        assert!(err.client_message().contains("re-upload"));
        assert!(!err.is_recoverable());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_server_rejection_recoverability() {
        let server_down = TransferError::ServerRejected {
            status: 503,
            body: "unavailable".to_string(),
        };
        let bad_request = TransferError::ServerRejected {
            status: 400,
            body: "bad".to_string(),
        };
        assert!(server_down.is_recoverable());
        assert!(!bad_request.is_recoverable());
        assert_eq!(server_down.status_code(), Some(503));
    }
}
