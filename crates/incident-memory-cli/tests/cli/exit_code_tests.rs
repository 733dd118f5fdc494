//! Exit code behavior.
//!
//! - 0: success, including "no reference case"
//! - 1: recoverable error (bad input, missing collection, dimension mismatch)
//! - 2: corrupted store

use rocksdb::{Options, DB};

use incident_memory_core::types::{IncidentId, OFFLINE_LANE};
use incident_memory_storage::column_families::{CF_LANE_VECTORS, INCIDENT_CFS};
use incident_memory_storage::schema::lane_vector_key;

use crate::helpers::*;

fn assert_warning(output: &CliOutput, needle: &str) {
    assert_eq!(
        output.exit_code, EXIT_WARNING,
        "expected exit 1.\nstdout: {}\nstderr: {}",
        output.stdout, output.stderr
    );
    assert!(output.stdout.trim().is_empty(), "no JSON on failure");
    assert!(
        output.stderr.contains(needle),
        "stderr should mention '{needle}': {}",
        output.stderr
    );
}

#[test]
fn test_search_before_init_is_collection_not_found() {
    let db = TestDb::new();
    let output = db.run(&["search", "--vector", "[1.0]", "--fit"]);
    assert_warning(&output, "Collection not found");
}

#[test]
fn test_dimension_mismatch_without_fit() {
    println!("\n=== TEST: unfitted vector is rejected ===");
    let db = TestDb::new();
    db.init();

    let output = db.run(&["upsert", "--id", "A", "--vector", "[0.1, 0.2, 0.3]"]);
    assert_warning(&output, "Dimension mismatch");

    // Nothing was written.
    let output = db.run(&["get", "A"]);
    assert_warning(&output, "Not found");
    println!("RESULT: PASS");
}

#[test]
fn test_invalid_arguments() {
    let db = TestDb::new();
    db.init();
    let e0 = db.vector_file("e0.json", &unit_vector(OFFLINE_DIM, 0));

    let output = db.run(&["upsert", "--vector-file", &e0, "--payload", "[1, 2]"]);
    assert_warning(&output, "payload must be a JSON object");

    let output = db.run(&["search", "--vector-file", &e0, "-k", "0"]);
    assert_warning(&output, "Invalid argument");

    let output = db.run(&["search", "--vector", "not-a-vector"]);
    assert_warning(&output, "JSON array");

    let output = db.run(&["search", "--vector-file", &e0, "--lane", "thermal_lane"]);
    assert_warning(&output, "thermal_lane");
}

#[test]
fn test_corrupted_lane_vector_exits_blocking() {
    println!("\n=== TEST: corrupted store -> exit 2 ===");
    let db = TestDb::new();
    db.init();
    let e0 = db.vector_file("e0.json", &unit_vector(OFFLINE_DIM, 0));
    db.run(&["upsert", "--id", "A", "--vector-file", &e0])
        .assert_success();

    {
        let raw = DB::open_cf(&Options::default(), db.db_path(), INCIDENT_CFS.iter().copied())
            .expect("raw open");
        let cf = raw.cf_handle(CF_LANE_VECTORS).expect("lane_vectors cf");
        raw.put_cf(
            cf,
            lane_vector_key("rail_safety_logs", OFFLINE_LANE, &IncidentId::from("A")),
            [0xba, 0xad],
        )
        .expect("inject garbage");
    }

    for args in [
        vec!["get", "A"],
        vec!["search", "--vector-file", e0.as_str()],
        vec!["reference", "--vector-file", e0.as_str()],
    ] {
        let output = db.run(&args);
        println!("  {:?} -> exit {}", args, output.exit_code);
        assert_eq!(
            output.exit_code, EXIT_BLOCKING,
            "corruption must block.\nstderr: {}",
            output.stderr
        );
        assert!(output.stderr.contains("Corrupted"), "{}", output.stderr);
    }
    println!("RESULT: PASS");
}
