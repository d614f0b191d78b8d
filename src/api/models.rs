//! Response models for the read-only listing surface

use serde::{Deserialize, Serialize};

use crate::store::ImageRecord;

/// One fully-downloaded image as shown on the listing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListingEntry {
    pub id: u64,
    pub url: String,
    pub datetime: String,
    pub filename: String,
}

impl ListingEntry {
    /// Build from a record; records without a filename are still
    /// in flight and have no listing representation
    pub fn from_record(record: ImageRecord) -> Option<Self> {
        let filename = record.filename?;
        Some(Self {
            id: record.id,
            url: record.url,
            datetime: record.datetime,
            filename,
        })
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
