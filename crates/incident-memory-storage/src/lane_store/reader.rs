//! Snapshot reads.

use incident_memory_core::types::{IncidentId, Payload};
use rocksdb::{Direction, IteratorMode, Snapshot};

use super::LaneStore;
use crate::column_families::{CF_LANE_VECTORS, CF_PAYLOADS};
use crate::error::{render_key, StorageError, StorageResult};
use crate::schema::{lane_prefix, lane_vector_key, parse_id_suffix, payload_key};
use crate::serialization::{deserialize_payload, deserialize_stored_vector, StoredVector};

/// Reads against one RocksDB snapshot.
///
/// All reads through the same reader see the database as of its creation.
pub(crate) struct LaneReader<'a> {
    store: &'a LaneStore,
    snapshot: Snapshot<'a>,
}

impl<'a> LaneReader<'a> {
    pub(crate) fn new(store: &'a LaneStore) -> Self {
        Self {
            store,
            snapshot: store.db().snapshot(),
        }
    }

    /// Calls `f` for every vector stored in `lane`, in key order. Returns the count.
    pub(crate) fn for_each_vector<F>(&self, collection: &str, lane: &str, mut f: F) -> StorageResult<usize>
    where
        F: FnMut(IncidentId, StoredVector),
    {
        let cf = self.store.get_cf(CF_LANE_VECTORS)?;
        let prefix = lane_prefix(collection, lane);
        let iter = self
            .snapshot
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut count = 0usize;
        for item in iter {
            let (key, value) = item.map_err(|e| {
                StorageError::rocksdb_op("iterate", CF_LANE_VECTORS, Some(&prefix), e)
            })?;
            if !key.starts_with(&prefix) {
                break;
            }
            let id = parse_id_suffix(CF_LANE_VECTORS, &key, &prefix)?;
            let stored = deserialize_stored_vector(&key, &value)?;
            f(id, stored);
            count += 1;
        }
        Ok(count)
    }

    /// Counts keys in `lane` without decoding values.
    pub(crate) fn count_lane(&self, collection: &str, lane: &str) -> StorageResult<usize> {
        let cf = self.store.get_cf(CF_LANE_VECTORS)?;
        let prefix = lane_prefix(collection, lane);
        let iter = self
            .snapshot
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut count = 0usize;
        for item in iter {
            let (key, _) = item.map_err(|e| {
                StorageError::rocksdb_op("iterate", CF_LANE_VECTORS, Some(&prefix), e)
            })?;
            if !key.starts_with(&prefix) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    pub(crate) fn vector(
        &self,
        collection: &str,
        lane: &str,
        id: &IncidentId,
    ) -> StorageResult<Option<StoredVector>> {
        let cf = self.store.get_cf(CF_LANE_VECTORS)?;
        let key = lane_vector_key(collection, lane, id);
        match self
            .snapshot
            .get_cf(cf, &key)
            .map_err(|e| StorageError::rocksdb_op("get", CF_LANE_VECTORS, Some(&key), e))?
        {
            Some(bytes) => Ok(Some(deserialize_stored_vector(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn payload(
        &self,
        collection: &str,
        id: &IncidentId,
    ) -> StorageResult<Option<Payload>> {
        let cf = self.store.get_cf(CF_PAYLOADS)?;
        let key = payload_key(collection, id);
        match self
            .snapshot
            .get_cf(cf, &key)
            .map_err(|e| StorageError::rocksdb_op("get", CF_PAYLOADS, Some(&key), e))?
        {
            Some(bytes) => Ok(Some(deserialize_payload(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Vector of a point seen earlier through this snapshot. Absence is corruption.
    pub(crate) fn required_vector(
        &self,
        collection: &str,
        lane: &str,
        id: &IncidentId,
    ) -> StorageResult<StoredVector> {
        self.vector(collection, lane, id)?
            .ok_or_else(|| StorageError::CorruptedValue {
                cf: CF_LANE_VECTORS,
                key: render_key(&lane_vector_key(collection, lane, id)),
                message: "lane vector missing from snapshot".to_string(),
            })
    }

    /// Payload of a point that is known to have a lane vector. Absence is corruption.
    pub(crate) fn required_payload(
        &self,
        collection: &str,
        id: &IncidentId,
    ) -> StorageResult<Payload> {
        self.payload(collection, id)?
            .ok_or_else(|| StorageError::MissingPayload {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }
}
