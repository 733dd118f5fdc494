//! Point writes and lookups.

use std::collections::BTreeMap;

use rocksdb::WriteBatch;
use tracing::{debug, instrument};

use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::types::{CollectionSchema, IncidentId, IncidentPoint, LaneSpec, Payload};
use incident_memory_core::vector::first_non_finite;

use super::LaneStore;
use crate::column_families::{CF_LANE_VECTORS, CF_PAYLOADS};
use crate::schema::{lane_vector_key, payload_key};
use crate::serialization::{serialize_payload, serialize_stored_vector, StoredVector};

/// Points per `WriteBatch` in [`LaneStore::upsert_batch`].
pub const UPSERT_CHUNK: usize = 50;

/// One point of a batched upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct PointWrite {
    pub id: IncidentId,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

impl PointWrite {
    pub fn new(id: impl Into<IncidentId>, vector: Vec<f32>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            vector,
            payload,
        }
    }
}

impl LaneStore {
    /// Write `vector` into `lane` of point `id` and replace the point's payload.
    ///
    /// Other lanes of an existing point are left untouched. The payload is replaced
    /// wholesale, never merged. Vector and payload land in one `WriteBatch`.
    ///
    /// # Errors
    ///
    /// - `CollectionNotFound` if the collection does not exist and cannot be auto-created
    /// - `NotFound` if the collection has no lane named `lane`
    /// - `DimensionMismatch` if `vector.len() != dim(lane)`
    /// - `InvalidArgument` for an empty text id or a NaN/Inf component
    /// - `BackendUnavailable` if RocksDB fails
    #[instrument(skip(self, vector, payload), fields(id = %id, dim = vector.len()))]
    pub fn upsert(
        &self,
        collection: &str,
        id: &IncidentId,
        lane: &str,
        vector: &[f32],
        payload: &Payload,
    ) -> MemoryResult<()> {
        let schema = self.resolve_schema(collection)?;
        let spec = schema.lane(lane)?;
        check_point(spec, id, vector)?;

        let mut batch = WriteBatch::default();
        let key = self.stage_point(&mut batch, &schema, spec, id, vector, payload)?;
        self.write(batch, CF_LANE_VECTORS, &key)?;

        debug!("Upserted point into {}/{}", collection, lane);
        Ok(())
    }

    /// Upsert many points into one lane.
    ///
    /// Every point is validated before anything is written. Points are then written in
    /// chunks of [`UPSERT_CHUNK`], one `WriteBatch` per chunk, so each point is still
    /// atomic on its own. Returns the number of points written.
    #[instrument(skip(self, points), fields(points = points.len()))]
    pub fn upsert_batch(
        &self,
        collection: &str,
        lane: &str,
        points: &[PointWrite],
    ) -> MemoryResult<usize> {
        let schema = self.resolve_schema(collection)?;
        let spec = schema.lane(lane)?;
        for point in points {
            check_point(spec, &point.id, &point.vector)?;
        }

        for chunk in points.chunks(UPSERT_CHUNK) {
            let mut batch = WriteBatch::default();
            let mut last_key = Vec::new();
            for point in chunk {
                last_key = self.stage_point(
                    &mut batch,
                    &schema,
                    spec,
                    &point.id,
                    &point.vector,
                    &point.payload,
                )?;
            }
            self.write(batch, CF_LANE_VECTORS, &last_key)?;
            debug!("Wrote chunk of {} points into {}/{}", chunk.len(), collection, lane);
        }

        Ok(points.len())
    }

    /// Payload of point `id`.
    ///
    /// # Errors
    ///
    /// - `CollectionNotFound` if the collection does not exist
    /// - `NotFound` if no point has this id
    pub fn get(&self, collection: &str, id: &IncidentId) -> MemoryResult<Payload> {
        self.collection_schema(collection)?;
        self.reader()
            .payload(collection, id)?
            .ok_or_else(|| point_not_found(collection, id))
    }

    /// Payload plus every lane vector of point `id`, read from one snapshot.
    pub fn get_point(&self, collection: &str, id: &IncidentId) -> MemoryResult<IncidentPoint> {
        let schema = self.collection_schema(collection)?;
        let reader = self.reader();

        let payload = reader
            .payload(collection, id)?
            .ok_or_else(|| point_not_found(collection, id))?;

        let mut vectors = BTreeMap::new();
        for lane in &schema.lanes {
            if let Some(stored) = reader.vector(collection, &lane.name, id)? {
                vectors.insert(lane.name.clone(), stored.vector);
            }
        }

        Ok(IncidentPoint {
            id: id.clone(),
            vectors,
            payload,
        })
    }

    /// Number of points with a vector in `lane`.
    pub fn count(&self, collection: &str, lane: &str) -> MemoryResult<usize> {
        let schema = self.collection_schema(collection)?;
        schema.lane(lane)?;
        Ok(self.reader().count_lane(collection, lane)?)
    }

    /// Stages one point's lane vector and payload. Returns the lane vector key.
    fn stage_point(
        &self,
        batch: &mut WriteBatch,
        schema: &CollectionSchema,
        spec: &LaneSpec,
        id: &IncidentId,
        vector: &[f32],
        payload: &Payload,
    ) -> MemoryResult<Vec<u8>> {
        let cf_vectors = self.get_cf(CF_LANE_VECTORS)?;
        let cf_payloads = self.get_cf(CF_PAYLOADS)?;

        let vector_key = lane_vector_key(&schema.name, &spec.name, id);
        let stored = StoredVector::for_lane(spec, vector);
        batch.put_cf(cf_vectors, &vector_key, serialize_stored_vector(&vector_key, &stored)?);

        let p_key = payload_key(&schema.name, id);
        batch.put_cf(cf_payloads, &p_key, serialize_payload(&p_key, payload)?);

        Ok(vector_key)
    }
}

/// Argument checks shared by single and batched upserts.
fn check_point(spec: &LaneSpec, id: &IncidentId, vector: &[f32]) -> MemoryResult<()> {
    id.validate()?;
    spec.check_dim(vector.len())?;
    if let Some((i, v)) = first_non_finite(vector) {
        return Err(MemoryError::InvalidArgument(format!(
            "vector for point '{id}' has non-finite component {v} at index {i}"
        )));
    }
    Ok(())
}

fn point_not_found(collection: &str, id: &IncidentId) -> MemoryError {
    MemoryError::NotFound(format!("point '{id}' in collection '{collection}'"))
}
