//! Cycle scheduler
//!
//! A single long-lived loop rather than a bare periodic timer: the next
//! tick is not armed until the current cycle has returned, so two cycles
//! can never overlap even if one overruns its interval.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;

use super::cycle::CycleController;

/// Run collection cycles forever on a fixed period. The first cycle
/// fires after one full interval. Intended to be spawned as a task and
/// aborted at shutdown.
pub async fn run(controller: CycleController, interval: Duration) {
    info!(interval_secs = interval.as_secs(), "Collector started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval's first tick completes immediately; consume it so the
    // first cycle waits a full period like every other one
    ticker.tick().await;

    loop {
        ticker.tick().await;
        controller.run_cycle().await;
    }
}
