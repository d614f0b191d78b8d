//! Time-boxed collection-and-download pipeline
//!
//! The scheduler fires the cycle controller on a fixed period; each
//! cycle pulls a batch from the coordinator and feeds items through the
//! download executor until the batch or the time budget runs out.

mod cycle;
mod error;
mod executor;
mod scheduler;

pub use cycle::{CycleBudget, CycleController};
pub use error::DownloadError;
pub use executor::Downloader;
pub use scheduler::run;
