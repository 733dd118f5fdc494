//! RocksDB-backed Lane Store.
//!
//! Durable multi-lane vector storage keyed by incident id, with point replace
//! semantics for the payload and lane-scoped writes for vectors.
//!
//! # Column Families Used
//!
//! - `collections`: schema per collection, fixed at creation
//! - `payloads`: one JSON payload per point
//! - `lane_vectors`: one vector per (collection, lane, point)
//!
//! # Consistency
//!
//! Every upsert is a single `WriteBatch` holding the lane vector and the payload, so a
//! reader never observes half of a write. Two writers racing on the same id resolve
//! last-writer-wins. Reads go through a RocksDB snapshot so a search sees vectors and
//! payloads from the same point in time.
//!
//! # Thread Safety
//!
//! `LaneStore` is `Send + Sync`. RocksDB handles locking for reads and writes; the
//! schema cache sits behind a `parking_lot::RwLock`.

mod collections;
mod points;
mod reader;


pub use points::{PointWrite, UPSERT_CHUNK};
pub(crate) use reader::LaneReader;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rocksdb::{Cache, ColumnFamily, Options, WriteBatch, WriteOptions, DB};
use tracing::{debug, error, info};

use incident_memory_core::config::{MemoryConfig, StorageConfig};
use incident_memory_core::error::MemoryResult;
use incident_memory_core::types::{CollectionSchema, LaneSpec};

use crate::column_families::{get_all_cf_descriptors, INCIDENT_CFS};
use crate::error::{StorageError, StorageResult};

/// Persistent multi-lane vector collections.
///
/// # Example
///
/// ```ignore
/// use incident_memory_core::types::{IncidentId, LaneSpec, Payload};
/// use incident_memory_storage::LaneStore;
///
/// let store = LaneStore::open("./incident_db")?;
/// store.ensure_collection("rail_safety_logs", &[LaneSpec::binary("offline_lane", 768)])?;
///
/// let mut e0 = vec![0.0; 768];
/// e0[0] = 1.0;
/// store.upsert("rail_safety_logs", &IncidentId::from("A"), "offline_lane", &e0, &Payload::new())?;
/// ```
pub struct LaneStore {
    db: Arc<DB>,
    /// Shared block cache across column families.
    _cache: Cache,
    path: PathBuf,
    enable_wal: bool,
    auto_create: bool,
    /// Lane layouts used to create collections on first touch when `auto_create` is on.
    templates: RwLock<HashMap<String, Vec<LaneSpec>>>,
    /// Schemas read from or written to the `collections` CF.
    schemas: RwLock<HashMap<String, Arc<CollectionSchema>>>,
    /// Serializes collection creation so check-then-create is atomic.
    create_lock: Mutex<()>,
}

impl LaneStore {
    /// Open a store at `path` with default configuration.
    ///
    /// Creates the database and all column families if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> MemoryResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    /// Open a store with custom configuration. `config.path` is ignored in favor of
    /// `path`.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: &StorageConfig,
    ) -> MemoryResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let path_str = path_buf.to_string_lossy().to_string();

        info!(
            path = %path_str,
            cache_mb = config.block_cache_size / (1024 * 1024),
            "Opening LaneStore"
        );

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_all_cf_descriptors(&cache);
        debug!("Opening database with {} column families", cf_descriptors.len());

        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            error!("Failed to open RocksDB at '{}': {}", path_str, e);
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        info!(
            path = %path_str,
            column_families = INCIDENT_CFS.len(),
            "Opened LaneStore"
        );

        Ok(Self {
            db: Arc::new(db),
            _cache: cache,
            path: path_buf,
            enable_wal: config.enable_wal,
            auto_create: config.auto_create_collections,
            templates: RwLock::new(HashMap::new()),
            schemas: RwLock::new(HashMap::new()),
            create_lock: Mutex::new(()),
        })
    }

    /// Open the store described by `config` and register the image and knowledge
    /// layouts as auto-create templates.
    pub fn from_config(config: &MemoryConfig) -> MemoryResult<Self> {
        config.validate()?;
        let store = Self::open_with_config(&config.storage.path, &config.storage)?;
        store.register_template(config.images.schema())?;
        store.register_template(config.knowledge.schema())?;
        Ok(store)
    }

    /// Remember a lane layout for auto-creation. Has no effect unless
    /// `auto_create_collections` is on.
    pub fn register_template(&self, schema: CollectionSchema) -> MemoryResult<()> {
        schema.validate()?;
        self.templates.write().insert(schema.name, schema.lanes);
        Ok(())
    }

    /// Database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if missing collections are created from templates on first use.
    pub fn auto_create(&self) -> bool {
        self.auto_create
    }

    /// Get a column family handle by name.
    pub(crate) fn get_cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: name.to_string(),
            })
    }

    pub(crate) fn db(&self) -> &DB {
        &self.db
    }

    /// Applies `batch` atomically.
    pub(crate) fn write(
        &self,
        batch: WriteBatch,
        cf: &'static str,
        key: &[u8],
    ) -> StorageResult<()> {
        let mut opts = WriteOptions::default();
        opts.disable_wal(!self.enable_wal);
        self.db.write_opt(batch, &opts).map_err(|e| {
            error!(cf, "Failed to write batch: {}", e);
            StorageError::rocksdb_op("write_batch", cf, Some(key), e)
        })
    }

    /// Snapshot reader for consistent multi-key reads.
    pub(crate) fn reader(&self) -> LaneReader<'_> {
        LaneReader::new(self)
    }
}
