//! Remote coordinator client
//!
//! The coordinator is the source of truth for pending downloads. This
//! node polls it for new work and reports per-item outcomes back so it
//! can update authoritative state.

mod client;

pub use client::HttpCoordinator;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// One pending download descriptor issued by the coordinator.
///
/// `id` and `hash` are remote-side correlation keys, echoed back
/// verbatim when reporting; they are never persisted locally and are
/// unrelated to the local record id.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkItem {
    pub id: i64,
    pub url: String,
    pub datetime: String,
    pub hash: String,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("coordinator unavailable: {0}")]
    Unavailable(String),

    #[error("malformed coordinator response: {0}")]
    Malformed(String),
}

/// Outcome of a best-effort completion/failure report.
///
/// Reporting never blocks local progress: local state has already
/// advanced by the time a report is sent, and an undelivered report is
/// logged and left for the coordinator to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Delivered,
    Undelivered,
}

/// Work-queue protocol seam between the collector and the coordinator
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Fetch the batch of newly-registered items; empty when none pending
    async fn fetch_batch(&self) -> Result<Vec<WorkItem>, RemoteError>;

    /// Report an item fully downloaded
    async fn report_done(&self, id: i64, hash: &str) -> ReportStatus;

    /// Report an item abandoned after a failed attempt
    async fn report_failed(&self, id: i64, hash: &str) -> ReportStatus;
}
