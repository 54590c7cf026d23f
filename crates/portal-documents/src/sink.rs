//! Where downloaded and generated files end up on the local machine.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Save-or-open capability for file bytes.
///
/// `save` keeps the file under its suggested name; `open` writes a
/// throwaway copy for viewing and returns where it was written. View copies
/// are ephemeral and may be removed by the sink once they expire.
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, suggested_name: &str, content: &[u8]) -> io::Result<PathBuf>;

    async fn open(&self, suggested_name: &str, content: &[u8]) -> io::Result<PathBuf>;
}

const DEFAULT_VIEW_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Filesystem sink. Saved files never overwrite each other: a clash gets a
/// ` (n)` suffix before the extension.
///
/// View copies live in their own directory. Each `open` first removes
/// copies older than the view TTL (24 hours unless configured).
#[derive(Debug, Clone)]
pub struct LocalFileSink {
    download_dir: PathBuf,
    view_dir: PathBuf,
    view_ttl: Duration,
}

impl LocalFileSink {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            view_dir: std::env::temp_dir().join("portal-view"),
            view_ttl: DEFAULT_VIEW_TTL,
        }
    }

    pub fn with_view_dir(mut self, view_dir: impl Into<PathBuf>) -> Self {
        self.view_dir = view_dir.into();
        self
    }

    pub fn with_view_ttl(mut self, view_ttl: Duration) -> Self {
        self.view_ttl = view_ttl;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn prune_view_copies(&self) {
        let Ok(mut entries) = fs::read_dir(&self.view_dir).await else {
            return;
        };
        let now = SystemTime::now();
        let mut removed = 0usize;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let expired = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > self.view_ttl);
            if expired && fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(
                view_dir = %self.view_dir.display(),
                removed,
                "Expired view copies removed"
            );
        }
    }

    async fn create_unique(&self, name: &str) -> io::Result<(PathBuf, fs::File)> {
        let (stem, ext) = split_extension(name);
        let mut attempt = 0u32;
        loop {
            let candidate = if attempt == 0 {
                name.to_string()
            } else {
                format!("{} ({}){}", stem, attempt, ext)
            };
            let path = self.download_dir.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl FileSink for LocalFileSink {
    async fn save(&self, suggested_name: &str, content: &[u8]) -> io::Result<PathBuf> {
        let start = std::time::Instant::now();
        fs::create_dir_all(&self.download_dir).await?;

        let name = sanitize_file_name(suggested_name);
        let (path, mut file) = self.create_unique(&name).await?;
        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;
        discard_on_error(&path, written).await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = content.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File saved"
        );
        Ok(path)
    }

    async fn open(&self, suggested_name: &str, content: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.view_dir).await?;
        self.prune_view_copies().await;

        let name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(suggested_name)
        );
        let path = self.view_dir.join(name);
        fs::write(&path, content).await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = content.len(),
            "File written for viewing"
        );
        Ok(path)
    }
}

/// A failed write leaves no partial file behind under the chosen name.
async fn discard_on_error(path: &Path, written: io::Result<()>) -> io::Result<()> {
    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "Failed to remove partial file"
            );
        }
        return Err(e);
    }
    Ok(())
}

/// Strips anything that would let a display name escape the target
/// directory or upset the filesystem.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}
