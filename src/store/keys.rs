/// Key layout and encoding utilities for Fjall partitions
///
/// Partition structure:
/// - `records`: rec:{id:016} -> ImageRecord (JSON)
/// - `by_time`: ts:{datetime}:{id:016} -> id (decimal string)
/// - `meta`: meta:{key} -> value (string)
///
/// Ids are zero-padded to 16 digits so lexicographic byte order matches
/// numeric order for range scans.

/// Encode a record key: rec:{id:016}
pub fn encode_record_key(id: u64) -> Vec<u8> {
    format!("rec:{:016}", id).into_bytes()
}

/// Decode a record key: rec:{id:016} -> id
pub fn decode_record_key(key: &[u8]) -> Option<u64> {
    let key_str = std::str::from_utf8(key).ok()?;
    key_str.strip_prefix("rec:")?.parse().ok()
}

/// Encode a time-index key: ts:{datetime}:{id:016}
///
/// The id suffix keeps keys unique when two records share a datetime.
pub fn encode_time_key(datetime: &str, id: u64) -> Vec<u8> {
    format!("ts:{}:{:016}", datetime, id).into_bytes()
}

/// Encode a metadata key: meta:{key}
pub fn encode_meta_key(key: &str) -> Vec<u8> {
    format!("meta:{}", key).into_bytes()
}
