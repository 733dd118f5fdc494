//! Lane Memory Integration Tests
//!
//! Every test opens a real RocksDB instance in a temp directory and drives the public
//! API end to end: upsert, search, compose, concurrent writers.
//!
//! # Layout
//!
//! - `retrieval_tests`: self-match round trips, ordering, argument errors
//! - `reference_tests`: composition outcomes, knowledge degradation, thresholds
//! - `concurrency_tests`: racing writers on one id, parallel ingest

mod helpers;
mod reference_tests;
mod retrieval_tests;
