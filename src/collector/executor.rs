//! Per-item download executor
//!
//! Drives one work item through register -> fetch -> validate -> stream
//! to disk -> finalize, rolling back the provisional record and any
//! partial file on every failure branch. Failures never propagate to
//! the cycle; they end with a mark-failed report and a return.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::remote::{Coordinator, ReportStatus, WorkItem};
use crate::store::RecordStore;

use super::error::DownloadError;

/// Extension used when the URL path has no dot-separated suffix
const FALLBACK_EXTENSION: &str = "img";

pub struct Downloader {
    store: Arc<RecordStore>,
    coordinator: Arc<dyn Coordinator>,
    client: reqwest::Client,
    image_dir: PathBuf,
}

impl Downloader {
    pub fn new(
        store: Arc<RecordStore>,
        coordinator: Arc<dyn Coordinator>,
        client: reqwest::Client,
        image_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            coordinator,
            client,
            image_dir,
        }
    }

    /// Process one work item to completion. Never fails the caller: every
    /// error path ends with local rollback and a mark-failed report.
    pub async fn execute(&self, item: &WorkItem) {
        info!(id = item.id, url = %item.url, "Downloading");

        let record_id = match self.store.insert(&item.url, &item.datetime) {
            Ok(id) => id,
            Err(e) => {
                warn!(id = item.id, error = %e, "Failed to register record");
                self.notify_failed(item).await;
                return;
            }
        };

        match self.try_download(item, record_id).await {
            Ok(filename) => {
                info!(id = item.id, record_id, filename, "Download complete");
                if self.coordinator.report_done(item.id, &item.hash).await
                    == ReportStatus::Undelivered
                {
                    warn!(id = item.id, "Completion report not delivered");
                }
            }
            Err(e) => {
                warn!(id = item.id, record_id, error = %e, "Download failed");
                if let Err(e) = self.store.delete(record_id) {
                    warn!(record_id, error = %e, "Rollback of record failed");
                }
                self.notify_failed(item).await;
            }
        }
    }

    /// Fetch, validate, stream to disk, and finalize the record.
    /// On error the partial file is already removed; the record is the
    /// caller's to roll back.
    async fn try_download(&self, item: &WorkItem, record_id: u64) -> Result<String, DownloadError> {
        let filename = derive_filename(record_id, &item.url);
        let path = self.image_dir.join(&filename);

        let response = self
            .client
            .get(&item.url)
            .send()
            .await
            .map_err(|e| DownloadError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::FetchFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // Catches URLs that resolve to an error page instead of image bytes
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_image_content_type(&content_type) {
            return Err(DownloadError::InvalidContent(content_type));
        }

        if let Err(e) = self.stream_to_disk(response, &path).await {
            discard_partial(&path).await;
            return Err(e);
        }

        if let Err(e) = self.store.update_filename(record_id, &filename) {
            // Keep the invariant: no file on disk without a completed record
            discard_partial(&path).await;
            return Err(e.into());
        }

        Ok(filename)
    }

    /// Write the response body to disk incrementally; large images must
    /// not be buffered whole into memory
    async fn stream_to_disk(
        &self,
        response: reqwest::Response,
        path: &Path,
    ) -> Result<(), DownloadError> {
        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| DownloadError::FetchFailed(e.to_string()))?;
            file.write_all(&bytes).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn notify_failed(&self, item: &WorkItem) {
        if self.coordinator.report_failed(item.id, &item.hash).await == ReportStatus::Undelivered {
            warn!(id = item.id, "Failure report not delivered");
        }
    }
}

/// Best-effort removal of a partial file; a missing file is fine,
/// anything else is logged without masking the original error
async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to delete partial file");
        }
    }
}

/// Derive the on-disk filename from the local record id and the URL's
/// extension: `{id}.{extension}`
fn derive_filename(record_id: u64, url: &str) -> String {
    format!("{}.{}", record_id, file_extension(url))
}

/// Last dot-separated segment of the URL path, query/fragment stripped
fn file_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => FALLBACK_EXTENSION,
    }
}

fn is_image_content_type(value: &str) -> bool {
    value
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}
