use thiserror::Error;

use crate::store::StoreError;

/// Per-item failure taxonomy.
///
/// Every variant is terminal for its item: the provisional record and
/// any partial file are rolled back and the coordinator is notified,
/// then the cycle moves on to the next item.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("image fetch failed: {0}")]
    FetchFailed(String),

    #[error("not an image: {0}")]
    InvalidContent(String),

    #[error("storage write failed: {0}")]
    StorageWriteFailed(#[from] std::io::Error),

    #[error("record store error: {0}")]
    Record(#[from] StoreError),
}
