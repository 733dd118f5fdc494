//! Key formats.
//!
//! | CF | Key Format |
//! |----|------------|
//! | collections | `collection` |
//! | payloads | `collection 0x00 id` |
//! | lane_vectors | `collection 0x00 lane 0x00 id` |
//!
//! Collection and lane names never contain NUL (enforced at schema validation), so
//! a prefix ending in NUL selects exactly one collection or lane. The id suffix is
//! the tagged encoding from [`IncidentId::to_key_bytes`].

use incident_memory_core::types::IncidentId;

use crate::error::{render_key, StorageError, StorageResult};

const SEP: u8 = 0x00;

/// Key for collections CF.
#[inline]
pub fn collection_key(collection: &str) -> Vec<u8> {
    collection.as_bytes().to_vec()
}

/// Prefix of every payload key in a collection.
pub fn payload_prefix(collection: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(collection.len() + 1);
    key.extend_from_slice(collection.as_bytes());
    key.push(SEP);
    key
}

/// Key for payloads CF.
pub fn payload_key(collection: &str, id: &IncidentId) -> Vec<u8> {
    let mut key = payload_prefix(collection);
    key.extend_from_slice(&id.to_key_bytes());
    key
}

/// Prefix of every vector key in one lane.
pub fn lane_prefix(collection: &str, lane: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(collection.len() + lane.len() + 2);
    key.extend_from_slice(collection.as_bytes());
    key.push(SEP);
    key.extend_from_slice(lane.as_bytes());
    key.push(SEP);
    key
}

/// Key for lane_vectors CF.
pub fn lane_vector_key(collection: &str, lane: &str, id: &IncidentId) -> Vec<u8> {
    let mut key = lane_prefix(collection, lane);
    key.extend_from_slice(&id.to_key_bytes());
    key
}

/// Parses the id suffix of a key that starts with `prefix`.
///
/// # Errors
///
/// `CorruptedKey` if the key is shorter than the prefix or the suffix is not a valid
/// tagged id.
pub fn parse_id_suffix(cf: &'static str, key: &[u8], prefix: &[u8]) -> StorageResult<IncidentId> {
    key.strip_prefix(prefix)
        .and_then(IncidentId::from_key_bytes)
        .ok_or_else(|| StorageError::CorruptedKey {
            cf,
            key: render_key(key),
        })
}
