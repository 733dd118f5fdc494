//! Value encodings.
//!
//! Schemas and vectors use bincode. Payloads use JSON because they hold arbitrary
//! `serde_json::Value`s, which bincode cannot decode.

use incident_memory_core::types::{CollectionSchema, LaneSpec, Payload};
use incident_memory_core::vector::BinaryVector;
use serde::{Deserialize, Serialize};

use crate::column_families::{CF_COLLECTIONS, CF_LANE_VECTORS, CF_PAYLOADS};
use crate::error::{render_key, StorageError, StorageResult};

/// What a lane keeps for one point.
///
/// Binary lanes keep both forms: `bits` drives the approximate pass and `vector` the
/// exact rescore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVector {
    pub vector: Vec<f32>,
    pub bits: Option<BinaryVector>,
}

impl StoredVector {
    /// Quantizes `vector` if the lane is binary.
    pub fn for_lane(lane: &LaneSpec, vector: &[f32]) -> Self {
        Self {
            vector: vector.to_vec(),
            bits: lane.is_binary().then(|| BinaryVector::from_floats(vector)),
        }
    }

    /// Packed bits, recomputed if the stored copy is missing.
    pub fn bits_or_quantize(&self) -> std::borrow::Cow<'_, BinaryVector> {
        match &self.bits {
            Some(bits) => std::borrow::Cow::Borrowed(bits),
            None => std::borrow::Cow::Owned(BinaryVector::from_floats(&self.vector)),
        }
    }
}

pub fn serialize_schema(schema: &CollectionSchema) -> StorageResult<Vec<u8>> {
    bincode::serialize(schema).map_err(|e| StorageError::Serialization {
        key: schema.name.clone(),
        message: e.to_string(),
    })
}

pub fn deserialize_schema(key: &[u8], bytes: &[u8]) -> StorageResult<CollectionSchema> {
    bincode::deserialize(bytes).map_err(|e| StorageError::CorruptedValue {
        cf: CF_COLLECTIONS,
        key: render_key(key),
        message: e.to_string(),
    })
}

pub fn serialize_stored_vector(key: &[u8], stored: &StoredVector) -> StorageResult<Vec<u8>> {
    bincode::serialize(stored).map_err(|e| StorageError::Serialization {
        key: render_key(key),
        message: e.to_string(),
    })
}

pub fn deserialize_stored_vector(key: &[u8], bytes: &[u8]) -> StorageResult<StoredVector> {
    bincode::deserialize(bytes).map_err(|e| StorageError::CorruptedValue {
        cf: CF_LANE_VECTORS,
        key: render_key(key),
        message: e.to_string(),
    })
}

pub fn serialize_payload(key: &[u8], payload: &Payload) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| StorageError::Serialization {
        key: render_key(key),
        message: e.to_string(),
    })
}

pub fn deserialize_payload(key: &[u8], bytes: &[u8]) -> StorageResult<Payload> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::CorruptedValue {
        cf: CF_PAYLOADS,
        key: render_key(key),
        message: e.to_string(),
    })
}
