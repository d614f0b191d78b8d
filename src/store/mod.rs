//! Local record store
//!
//! Persists per-download metadata in a Fjall keyspace with three
//! partitions: the records themselves (keyed by a local auto-increment
//! id), a datetime secondary index for time-ordered listing, and a
//! metadata partition holding the id sequence.

mod error;
mod keys;
mod records;

pub use error::{Result, StoreError};
pub use records::{ImageRecord, RecordStore};
