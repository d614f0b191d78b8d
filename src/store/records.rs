use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{Result, StoreError};
use super::keys::{encode_meta_key, encode_record_key, encode_time_key};

const NEXT_ID_KEY: &str = "next_id";

/// Locally-owned metadata for one download attempt.
///
/// `filename` is set exactly once, after the image has been fully written
/// to disk. Records from failed attempts are deleted as part of rollback,
/// so a persisted record with `filename: None` only exists while its
/// download is in flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: u64,
    pub url: String,
    pub datetime: String,
    pub filename: Option<String>,
    /// Set together with `filename` when the download finishes
    pub downloaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fjall-backed persistent store for image records
pub struct RecordStore {
    keyspace: Keyspace,
    records: PartitionHandle,
    by_time: PartitionHandle,
    meta: PartitionHandle,
    next_id: AtomicU64,
}

impl RecordStore {
    /// Open or create a record store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening record store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let records = keyspace.open_partition("records", PartitionCreateOptions::default())?;
        let by_time = keyspace.open_partition("by_time", PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition("meta", PartitionCreateOptions::default())?;

        // Restore the id sequence; ids must stay unique across restarts.
        let next_id = match meta.get(encode_meta_key(NEXT_ID_KEY))? {
            Some(value) => String::from_utf8_lossy(&value).parse().unwrap_or(0),
            None => 0,
        };

        info!(next_id, "Record store opened");
        Ok(Self {
            keyspace,
            records,
            by_time,
            meta,
            next_id: AtomicU64::new(next_id),
        })
    }

    /// Insert a new record with no filename, returning its assigned id
    pub fn insert(&self, url: &str, datetime: &str) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.meta
            .insert(encode_meta_key(NEXT_ID_KEY), id.to_string().as_bytes())?;

        let record = ImageRecord {
            id,
            url: url.to_string(),
            datetime: datetime.to_string(),
            filename: None,
            downloaded_at: None,
        };
        let value = serde_json::to_vec(&record)?;
        self.records.insert(encode_record_key(id), value)?;
        self.by_time
            .insert(encode_time_key(datetime, id), id.to_string().as_bytes())?;

        debug!(id, url, "Inserted record");
        Ok(id)
    }

    /// Get a record by id
    pub fn get(&self, id: u64) -> Result<Option<ImageRecord>> {
        match self.records.get(encode_record_key(id))? {
            Some(value) => {
                let record = serde_json::from_slice(&value)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List all records in id order
    pub fn list(&self) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::new();
        for item in self.records.iter() {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    /// List all records ordered by datetime, newest first
    pub fn list_by_time(&self) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::new();
        for item in self.by_time.iter().rev() {
            let (_, value) = item?;
            let raw = String::from_utf8_lossy(&value).to_string();
            let id: u64 = raw
                .parse()
                .map_err(|_| StoreError::InvalidIndexEntry(raw))?;
            // Skip dangling index entries rather than failing the listing.
            if let Some(record) = self.get(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Delete a record and its time-index entry; deleting a missing
    /// record is a no-op
    pub fn delete(&self, id: u64) -> Result<()> {
        if let Some(record) = self.get(id)? {
            self.by_time.remove(encode_time_key(&record.datetime, id))?;
            self.records.remove(encode_record_key(id))?;
            debug!(id, "Deleted record");
        }
        Ok(())
    }

    /// Set the filename on an existing record
    pub fn update_filename(&self, id: u64, filename: &str) -> Result<()> {
        let mut record = self.get(id)?.ok_or(StoreError::RecordNotFound(id))?;
        record.filename = Some(filename.to_string());
        record.downloaded_at = Some(chrono::Utc::now());
        let value = serde_json::to_vec(&record)?;
        self.records.insert(encode_record_key(id), value)?;
        debug!(id, filename, "Updated record filename");
        Ok(())
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }
}
