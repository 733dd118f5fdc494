//! RocksDB column family definitions.
//!
//! # Column Families (3 total)
//! | Name | Purpose | Key Format | Value |
//! |------|---------|------------|-------|
//! | collections | Collection schemas | name | bincode `CollectionSchema` |
//! | payloads | Point payloads | collection NUL id | JSON object |
//! | lane_vectors | Per-lane vectors | collection NUL lane NUL id | bincode `StoredVector` |
//!
//! All option builders are infallible. Errors only occur at DB open time.

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

/// Collection name to schema.
pub const CF_COLLECTIONS: &str = "collections";

/// Point payload, replaced on every upsert.
pub const CF_PAYLOADS: &str = "payloads";

/// One vector per (collection, lane, id). Prefix-scanned by search.
pub const CF_LANE_VECTORS: &str = "lane_vectors";

pub const INCIDENT_CFS: &[&str] = &[CF_COLLECTIONS, CF_PAYLOADS, CF_LANE_VECTORS];

/// Small, rarely written: point lookups only.
pub fn collections_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);
    opts
}

/// JSON payloads compress well.
pub fn payloads_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.create_if_missing(true);
    opts
}

/// Dense floats barely compress; optimized for sequential prefix scans.
pub fn lane_vectors_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_block_size(16 * 1024);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);
    opts
}

/// Descriptors for every column family, sharing one block cache.
pub fn get_all_cf_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_COLLECTIONS, collections_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_PAYLOADS, payloads_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_LANE_VECTORS, lane_vectors_cf_options(cache)),
    ]
}
