//! Collection lifecycle: create, look up, list.

use std::sync::Arc;

use rocksdb::IteratorMode;
use tracing::{debug, info, warn};

use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::types::{CollectionSchema, LaneSpec};

use super::LaneStore;
use crate::column_families::CF_COLLECTIONS;
use crate::error::{StorageError, StorageResult};
use crate::schema::collection_key;
use crate::serialization::{deserialize_schema, serialize_schema};

impl LaneStore {
    /// Create `name` with `lanes` if it does not exist.
    ///
    /// Idempotent. If the collection already exists its stored schema is returned
    /// unchanged; a differing lane list is logged and ignored, since schemas are never
    /// altered in place.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for an empty/NUL name, no lanes, a zero dimension or
    ///   duplicate lane names
    /// - `BackendUnavailable` if RocksDB fails
    pub fn ensure_collection(
        &self,
        name: &str,
        lanes: &[LaneSpec],
    ) -> MemoryResult<Arc<CollectionSchema>> {
        let schema = CollectionSchema::new(name, lanes.to_vec());
        schema.validate()?;

        let _guard = self.create_lock.lock();

        if let Some(existing) = self.load_schema(name)? {
            if !existing.same_lanes(lanes) {
                warn!(
                    collection = name,
                    "ensure_collection called with a different lane layout; keeping the stored schema"
                );
            }
            return Ok(existing);
        }

        self.persist_schema(schema)
    }

    /// True if the collection has been created.
    pub fn collection_exists(&self, name: &str) -> MemoryResult<bool> {
        Ok(self.load_schema(name)?.is_some())
    }

    /// Stored schema of `name`.
    ///
    /// # Errors
    ///
    /// `CollectionNotFound` if the collection was never created.
    pub fn collection_schema(&self, name: &str) -> MemoryResult<Arc<CollectionSchema>> {
        self.load_schema(name)?
            .ok_or_else(|| MemoryError::CollectionNotFound(name.to_string()))
    }

    /// All collections, ordered by name.
    pub fn list_collections(&self) -> MemoryResult<Vec<CollectionSchema>> {
        let cf = self.get_cf(CF_COLLECTIONS)?;
        let mut out = Vec::new();
        for item in self.db().iterator_cf(cf, IteratorMode::Start) {
            let (key, value) =
                item.map_err(|e| StorageError::rocksdb_op("iterate", CF_COLLECTIONS, None, e))?;
            out.push(deserialize_schema(&key, &value)?);
        }
        Ok(out)
    }

    /// Schema for an upsert or search target.
    ///
    /// Missing collections are created from a registered template when auto-creation is
    /// on; otherwise they are `CollectionNotFound`.
    pub(crate) fn resolve_schema(&self, name: &str) -> MemoryResult<Arc<CollectionSchema>> {
        if let Some(schema) = self.load_schema(name)? {
            return Ok(schema);
        }

        if self.auto_create {
            let template = self.templates.read().get(name).cloned();
            if let Some(lanes) = template {
                debug!(collection = name, "Auto-creating collection from template");
                return self.ensure_collection(name, &lanes);
            }
        }

        Err(MemoryError::CollectionNotFound(name.to_string()))
    }

    /// Cached schema, falling back to the `collections` CF.
    fn load_schema(&self, name: &str) -> StorageResult<Option<Arc<CollectionSchema>>> {
        if let Some(schema) = self.schemas.read().get(name) {
            return Ok(Some(Arc::clone(schema)));
        }

        let cf = self.get_cf(CF_COLLECTIONS)?;
        let key = collection_key(name);
        let Some(bytes) = self
            .db()
            .get_cf(cf, &key)
            .map_err(|e| StorageError::rocksdb_op("get", CF_COLLECTIONS, Some(&key), e))?
        else {
            return Ok(None);
        };

        let schema = Arc::new(deserialize_schema(&key, &bytes)?);
        self.schemas
            .write()
            .insert(name.to_string(), Arc::clone(&schema));
        Ok(Some(schema))
    }

    fn persist_schema(&self, schema: CollectionSchema) -> MemoryResult<Arc<CollectionSchema>> {
        let cf = self.get_cf(CF_COLLECTIONS)?;
        let key = collection_key(&schema.name);
        let bytes = serialize_schema(&schema)?;

        let mut batch = rocksdb::WriteBatch::default();
        batch.put_cf(cf, &key, bytes);
        self.write(batch, CF_COLLECTIONS, &key)?;

        info!(
            collection = %schema.name,
            lanes = ?schema.lanes.iter().map(|l| (l.name.as_str(), l.dim)).collect::<Vec<_>>(),
            "Created collection"
        );

        let schema = Arc::new(schema);
        self.schemas
            .write()
            .insert(schema.name.clone(), Arc::clone(&schema));
        Ok(schema)
    }
}
