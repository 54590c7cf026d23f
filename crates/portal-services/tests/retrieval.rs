use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use portal_api_client::HttpFileClient;
use portal_core::{
    ChecklistCategory, ChecklistStatus, DocumentCategory, DocumentRecord, ErrorMetadata,
    RemoteFile, TransferError,
};
use portal_documents::LocalFileSink;
use portal_services::{BookingDocuments, UploadValidator};
use portal_storage::{MemoryStore, RecordStore};
use uuid::Uuid;

struct Fixture {
    server: mockito::ServerGuard,
    store: Arc<MemoryStore>,
    documents: BookingDocuments,
    downloads: tempfile::TempDir,
    views: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let server = mockito::Server::new_async().await;
    let downloads = tempfile::tempdir().unwrap();
    let views = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let client = HttpFileClient::new(server.url(), Duration::from_secs(5)).unwrap();
    let sink = LocalFileSink::new(downloads.path()).with_view_dir(views.path());

    let documents = BookingDocuments::new(
        "BK-1",
        store.clone(),
        Arc::new(client),
        Arc::new(sink),
        UploadValidator::default(),
    );
    Fixture {
        server,
        store,
        documents,
        downloads,
        views,
    }
}

fn record(category: DocumentCategory, name: &str, remote_id: Option<&str>) -> DocumentRecord {
    match remote_id {
        Some(id) => DocumentRecord::from_upload(
            "BK-1",
            category,
            name,
            4,
            RemoteFile {
                file_id: id.to_string(),
                file_url: None,
            },
        ),
        None => DocumentRecord {
            id: Uuid::new_v4(),
            booking_id: "BK-1".to_string(),
            category,
            display_name: name.to_string(),
            size_bytes: 4,
            uploaded_at: Utc::now(),
            remote_file_id: None,
            remote_url: None,
            retrieval_handle: None,
        },
    }
}

#[tokio::test]
async fn test_missing_remote_reference_makes_no_request() {
    let mut f = fixture().await;
    let any_request = f
        .server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut orphan = record(DocumentCategory::PAN_CARD, "pan.pdf", None);
    f.store.append("BK-1", orphan.clone()).await.unwrap();

    let listed = f.documents.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_retrievable());

    let err = f.documents.download(&orphan).await.unwrap_err();
    assert!(matches!(
        err,
        TransferError::MissingRemoteReference { record_id, .. } if record_id == orphan.id
    ));
    assert!(err.client_message().contains("re-upload"));

    let err = f.documents.view(&mut orphan).await.unwrap_err();
    assert!(matches!(err, TransferError::MissingRemoteReference { .. }));
    assert!(orphan.retrieval_handle.is_none());

    any_request.assert_async().await;
    assert_eq!(std::fs::read_dir(f.downloads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_saves_under_display_name() {
    let mut f = fixture().await;
    let mock = f
        .server
        .mock("GET", "/api/files/download/f-1")
        .with_status(200)
        .with_body("%PDF")
        .create_async()
        .await;

    let rec = record(DocumentCategory::PAN_CARD, "pan card.pdf", Some("f-1"));
    let path = f.documents.download(&rec).await.unwrap();

    assert_eq!(path, f.downloads.path().join("pan card.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_view_reuses_open_copy() {
    let mut f = fixture().await;
    let mock = f
        .server
        .mock("GET", "/api/files/download/f-2")
        .with_status(200)
        .with_body("image")
        .expect(1)
        .create_async()
        .await;

    let mut rec = record(DocumentCategory::PHOTOGRAPH, "photo.jpg", Some("f-2"));
    let first = f.documents.view(&mut rec).await.unwrap();
    let second = f.documents.view(&mut rec).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(rec.retrieval_handle.as_deref(), Some(first.as_path()));
    assert_eq!(std::fs::read_dir(f.downloads.path()).unwrap().count(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_rejection_surfaces_status() {
    let mut f = fixture().await;
    f.server
        .mock("GET", "/api/files/download/gone")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let rec = record(DocumentCategory::PAN_CARD, "pan.pdf", Some("gone"));
    let err = f.documents.download(&rec).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_checklist_follows_store() {
    let f = fixture().await;

    let checklist = f.documents.checklist().await.unwrap();
    assert_eq!(checklist.pending_count(), 5);

    f.store
        .append(
            "BK-1",
            record(DocumentCategory::PAN_CARD, "pan.pdf", Some("a")),
        )
        .await
        .unwrap();
    f.store
        .append(
            "BK-1",
            record(DocumentCategory::DemandLetter, "demand.pdf", Some("b")),
        )
        .await
        .unwrap();

    let checklist = f.documents.checklist().await.unwrap();
    assert_eq!(
        checklist.status_of(ChecklistCategory::PanCard),
        ChecklistStatus::Complete
    );
    assert_eq!(checklist.complete_count(), 1);

    f.store
        .append(
            "BK-1",
            record(DocumentCategory::PAN_CARD, "pan-back.pdf", Some("c")),
        )
        .await
        .unwrap();
    let checklist = f.documents.checklist().await.unwrap();
    assert_eq!(
        checklist.status_of(ChecklistCategory::PanCard),
        ChecklistStatus::Complete
    );
    assert_eq!(checklist.complete_count(), 1);
    assert!(!checklist.is_complete());
}

#[tokio::test]
async fn test_record_lookup() {
    let f = fixture().await;
    let rec = record(DocumentCategory::Invoice, "inv.pdf", Some("x"));
    f.store.append("BK-1", rec.clone()).await.unwrap();

    assert_eq!(f.documents.record(rec.id).await.unwrap(), Some(rec));
    assert_eq!(f.documents.record(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_upload_session_is_bound_to_booking() {
    let f = fixture().await;
    let session = f.documents.upload_session();
    assert_eq!(session.booking_id(), "BK-1");
    assert!(session.staged().is_empty());
}

#[tokio::test]
async fn test_view_with_open_copy_still_requires_remote_reference() {
    let mut f = fixture().await;
    let any_request = f
        .server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let stale = f.views.path().join("stale-pan.pdf");
    std::fs::write(&stale, b"%PDF").unwrap();

    let mut orphan = record(DocumentCategory::PAN_CARD, "pan.pdf", None);
    orphan.retrieval_handle = Some(stale.clone());

    let err = f.documents.view(&mut orphan).await.unwrap_err();
    assert!(matches!(
        err,
        TransferError::MissingRemoteReference { record_id, .. } if record_id == orphan.id
    ));
    assert_eq!(orphan.retrieval_handle.as_deref(), Some(stale.as_path()));
    any_request.assert_async().await;
}
