//! Collection cycle controller
//!
//! One cycle: fetch a batch from the coordinator and download what fits
//! inside the time budget. The budget reserves headroom before the next
//! scheduled tick so the last item's network I/O can finish cleanly.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::remote::Coordinator;

use super::executor::Downloader;

/// Per-cycle timing budget
#[derive(Debug, Clone, Copy)]
pub struct CycleBudget {
    /// Wall-clock period between cycle starts
    pub interval: Duration,
    /// Headroom kept free before the next tick; no new item is claimed
    /// once `interval - reserve` has elapsed
    pub reserve: Duration,
}

impl CycleBudget {
    fn deadline_from(&self, start: Instant) -> Instant {
        start + self.interval.saturating_sub(self.reserve)
    }
}

pub struct CycleController {
    coordinator: Arc<dyn Coordinator>,
    downloader: Downloader,
    budget: CycleBudget,
}

impl CycleController {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        downloader: Downloader,
        budget: CycleBudget,
    ) -> Self {
        Self {
            coordinator,
            downloader,
            budget,
        }
    }

    /// Run one collection cycle. Never fails: a coordinator outage is an
    /// empty cycle, a failed item is that item's problem, and a blown
    /// deadline just defers the tail of the batch to the next cycle.
    pub async fn run_cycle(&self) {
        let deadline = self.budget.deadline_from(Instant::now());

        let batch = match self.coordinator.fetch_batch().await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Batch fetch failed, skipping cycle");
                return;
            }
        };

        if batch.is_empty() {
            info!("No new images");
            return;
        }
        info!(count = batch.len(), "Found new images");

        for item in &batch {
            // Checked between items only; an in-flight download runs to
            // completion even past the deadline.
            if Instant::now() >= deadline {
                info!("Stopping (time)");
                return;
            }
            self.downloader.execute(item).await;
        }
        info!("Stopping (done)");
    }
}
