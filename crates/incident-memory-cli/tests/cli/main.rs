//! Integration tests for the incident memory CLI.
//!
//! # Test Architecture
//! Tests execute the REAL CLI binary against a REAL RocksDB database in a temp dir
//! and parse the JSON it prints on stdout.
//!
//! # Test Categories
//! - `command_tests`: init, upsert, get, search, ingest-knowledge, reference
//! - `exit_code_tests`: argument errors (exit 1) and store corruption (exit 2)
//!
//! # Running Tests
//! ```bash
//! cargo test --package incident-memory-cli --test cli -- --nocapture
//! ```

mod command_tests;
mod exit_code_tests;
mod helpers;
