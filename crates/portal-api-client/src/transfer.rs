use async_trait::async_trait;
use bytes::Bytes;
use portal_core::{DocumentCategory, RemoteFile, TransferError};

/// Transfer of document bytes to and from the remote file service.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Upload one file under a category. Returns the identifier the service
    /// assigned; a response without one is a `ContractViolation`.
    async fn upload(
        &self,
        file_name: &str,
        content: Bytes,
        category: &DocumentCategory,
    ) -> Result<RemoteFile, TransferError>;

    /// Fetch the stored bytes of a previously uploaded file.
    async fn fetch(&self, remote_file_id: &str) -> Result<Bytes, TransferError>;
}
