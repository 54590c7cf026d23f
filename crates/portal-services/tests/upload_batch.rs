use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mockito::Matcher;
use portal_api_client::{FileTransfer, HttpFileClient};
use portal_core::{DocumentCategory, RemoteFile, TransferError};
use portal_services::{SessionState, StagedFile, UploadSession, UploadValidator};
use portal_storage::{JsonFileStore, MemoryStore, RecordStore};

/// Transfer whose behaviour is scripted per file name.
#[derive(Default)]
struct ScriptedTransfer {
    failures: HashMap<String, TransferError>,
    delays: HashMap<String, Duration>,
    uploads: AtomicUsize,
}

impl ScriptedTransfer {
    fn failing(mut self, name: &str, error: TransferError) -> Self {
        self.failures.insert(name.to_string(), error);
        self
    }

    fn slow(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }
}

#[async_trait]
impl FileTransfer for ScriptedTransfer {
    async fn upload(
        &self,
        file_name: &str,
        _content: Bytes,
        _category: &DocumentCategory,
    ) -> Result<RemoteFile, TransferError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(file_name) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(file_name) {
            Some(error) => Err(error.clone()),
            None => Ok(RemoteFile {
                file_id: format!("remote-{}", file_name),
                file_url: None,
            }),
        }
    }

    async fn fetch(&self, _remote_file_id: &str) -> Result<Bytes, TransferError> {
        Ok(Bytes::new())
    }
}

fn stage_three(session: &mut UploadSession) {
    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        session
            .stage_file(StagedFile::new(name, format!("content of {}", name)))
            .unwrap();
    }
}

#[tokio::test]
async fn test_second_file_fails_others_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(dir.path()).await.unwrap());
    let transfer = Arc::new(
        ScriptedTransfer::default()
            .failing(
                "two.pdf",
                TransferError::ServerRejected {
                    status: 500,
                    body: "disk full".to_string(),
                },
            )
            .slow("one.pdf", Duration::from_millis(30)),
    );

    let mut session = UploadSession::new(
        "BK-2024-001",
        transfer.clone(),
        store.clone(),
        UploadValidator::default(),
    );
    session
        .select_category(DocumentCategory::INCOME_PROOF)
        .unwrap();
    stage_three(&mut session);

    let report = session.submit().await.unwrap();

    assert_eq!(report.summary(), "2 of 3 uploaded");
    assert_eq!(transfer.uploads.load(Ordering::SeqCst), 3);

    let records = store.list_for("BK-2024-001").await.unwrap();
    let mut names: Vec<_> = records.iter().map(|r| r.display_name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["one.pdf", "three.pdf"]);
    assert!(records
        .iter()
        .all(|r| r.category == DocumentCategory::INCOME_PROOF && r.is_retrievable()));

    match session.state() {
        SessionState::Failed(failure) => {
            assert_eq!(failure.file_name, "two.pdf");
            assert_eq!(failure.position, 1);
            assert_eq!(failure.error.status_code(), Some(500));
        }
        other => panic!("expected failed session, got {:?}", other),
    }
}

#[tokio::test]
async fn test_first_failure_in_staging_order_is_reported() {
    let store = Arc::new(MemoryStore::new());
    let transfer = Arc::new(
        ScriptedTransfer::default()
            .failing(
                "two.pdf",
                TransferError::NetworkUnavailable("reset".to_string()),
            )
            .failing(
                "three.pdf",
                TransferError::ContractViolation("no id".to_string()),
            )
            .slow("two.pdf", Duration::from_millis(30)),
    );
    let mut session = UploadSession::new("BK-1", transfer, store, UploadValidator::default());
    stage_three(&mut session);

    let report = session.submit().await.unwrap();
    assert_eq!(report.summary(), "1 of 3 uploaded");
    assert_eq!(report.failures.len(), 2);

    let SessionState::Failed(failure) = session.state() else {
        panic!("expected failed session");
    };
    assert_eq!(failure.file_name, "two.pdf");
}

#[tokio::test]
async fn test_retry_after_failure_uploads_only_failed_files() {
    let store = Arc::new(MemoryStore::new());
    let failing = Arc::new(ScriptedTransfer::default().failing(
        "two.pdf",
        TransferError::NetworkUnavailable("offline".to_string()),
    ));
    let mut session = UploadSession::new(
        "BK-1",
        failing,
        store.clone(),
        UploadValidator::default(),
    );
    stage_three(&mut session);
    session.submit().await.unwrap();

    session.acknowledge_failure().unwrap();
    assert_eq!(session.state(), &SessionState::Idle);
    let staged: Vec<_> = session.staged().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(staged, vec!["two.pdf"]);

    // Same staged files, now against a healthy service.
    let mut retry = UploadSession::new(
        "BK-1",
        Arc::new(ScriptedTransfer::default()),
        store.clone(),
        UploadValidator::default(),
    );
    for file in session.staged() {
        retry.stage_file(file.clone()).unwrap();
    }
    let report = retry.submit().await.unwrap();
    assert!(report.is_complete());
    assert_eq!(store.list_for("BK-1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_dropped_submit_still_records_uploads() {
    let store = Arc::new(MemoryStore::new());
    let transfer = Arc::new(
        ScriptedTransfer::default()
            .slow("one.pdf", Duration::from_millis(50))
            .slow("two.pdf", Duration::from_millis(50))
            .slow("three.pdf", Duration::from_millis(50)),
    );
    let mut session = UploadSession::new(
        "BK-1",
        transfer,
        store.clone(),
        UploadValidator::default(),
    );
    stage_three(&mut session);

    let closed = tokio::time::timeout(Duration::from_millis(5), session.submit()).await;
    assert!(closed.is_err());
    drop(session);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(store.list_for("BK-1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_batch_against_http_service() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("POST", "/api/files/upload")
        .match_body(Matcher::Regex(r#"filename="(one|three)\.pdf""#.to_string()))
        .with_status(200)
        .with_body(r#"{"fileId":"abc"}"#)
        .expect(2)
        .create_async()
        .await;
    let rejected = server
        .mock("POST", "/api/files/upload")
        .match_body(Matcher::Regex(r#"filename="two\.pdf""#.to_string()))
        .with_status(413)
        .with_body("too large")
        .expect(1)
        .create_async()
        .await;

    let client = HttpFileClient::new(server.url(), Duration::from_secs(5)).unwrap();
    let store = Arc::new(MemoryStore::new());
    let mut session = UploadSession::new(
        "BK-1",
        Arc::new(client),
        store.clone(),
        UploadValidator::default(),
    );
    stage_three(&mut session);

    let report = session.submit().await.unwrap();

    assert_eq!(report.summary(), "2 of 3 uploaded");
    let SessionState::Failed(failure) = session.state() else {
        panic!("expected failed session");
    };
    assert_eq!(failure.file_name, "two.pdf");
    assert_eq!(failure.error.status_code(), Some(413));
    assert_eq!(store.list_for("BK-1").await.unwrap().len(), 2);
    ok.assert_async().await;
    rejected.assert_async().await;
}
