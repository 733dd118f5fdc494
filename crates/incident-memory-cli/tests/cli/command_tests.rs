//! Command round trips through the real binary.

use serde_json::json;

use crate::helpers::*;

#[test]
fn test_init_creates_configured_collections() {
    println!("\n=== TEST: init + collections ===");
    let db = TestDb::new();

    let report = db.run(&["init"]).assert_success();
    let names: Vec<&str> = report["collections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["rail_safety_logs", "railway_knowledge"]);

    // Second init is a no-op.
    db.run(&["init"]).assert_success();

    let listed = db.run(&["collections"]).assert_success();
    let rail = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "rail_safety_logs")
        .expect("image collection listed");
    let lanes = rail["lanes"].as_array().unwrap();
    assert_eq!(lanes.len(), 2);
    for lane in lanes {
        match lane["name"].as_str().unwrap() {
            "fast_lane" => {
                assert_eq!(lane["dim"], 1536);
                assert_eq!(lane["quantization"], "none");
            }
            "offline_lane" => {
                assert_eq!(lane["dim"], 768);
                assert_eq!(lane["quantization"], "binary");
            }
            other => panic!("unexpected lane {other}"),
        }
        assert_eq!(lane["points"], 0);
    }
    println!("RESULT: PASS");
}

#[test]
fn test_upsert_get_search_round_trip() {
    println!("\n=== TEST: upsert -> get -> search ===");
    let db = TestDb::new();
    db.init();
    let e0 = db.vector_file("e0.json", &unit_vector(OFFLINE_DIM, 0));

    let report = db
        .run(&[
            "upsert",
            "--id",
            "crack_01.jpg",
            "--fidelity",
            "low",
            "--vector-file",
            &e0,
            "--payload",
            r#"{"status": "CRITICAL", "recommended_action": "STOP_TRAIN"}"#,
        ])
        .assert_success();
    assert_eq!(report["id"], "crack_01.jpg");
    assert_eq!(report["lane"], "offline_lane");
    assert_eq!(report["dim"], 768);

    let point = db.run(&["get", "crack_01.jpg"]).assert_success();
    assert_eq!(point["payload"]["status"], "CRITICAL");
    assert_eq!(point["lanes"], json!(["offline_lane"]));
    assert!(point.get("vectors").is_none());

    let results = db
        .run(&["search", "--vector-file", &e0, "-k", "3"])
        .assert_success();
    let hits = results["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], "crack_01.jpg");
    assert!((hits[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-5);
    assert_eq!(hits[0]["payload"]["recommended_action"], "STOP_TRAIN");
    assert_eq!(results["rescored"], true);
    println!("RESULT: PASS");
}

#[test]
fn test_upsert_fit_and_numeric_ids() {
    let db = TestDb::new();
    db.init();

    let report = db
        .run(&["upsert", "--id", "42", "--vector", "[3.0, 4.0]", "--fit"])
        .assert_success();
    assert_eq!(report["id"], 42);
    assert_eq!(report["dim"], 768);

    let point = db.run(&["get", "42", "--with-vectors"]).assert_success();
    let stored = point["vectors"]["offline_lane"].as_array().unwrap();
    assert_eq!(stored.len(), 768);
    assert!((stored[0].as_f64().unwrap() - 0.6).abs() < 1e-6);
    assert!((stored[1].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert_eq!(stored[2], 0.0);
}

#[test]
fn test_upsert_without_id_generates_uuid() {
    let db = TestDb::new();
    db.init();
    let e3 = db.vector_file("e3.json", &unit_vector(OFFLINE_DIM, 3));

    let report = db.run(&["upsert", "--vector-file", &e3]).assert_success();
    let id = report["id"].as_str().expect("generated ids are text");
    assert_eq!(id.len(), 36);

    let point = db.run(&["get", id]).assert_success();
    assert_eq!(point["id"], id);
    assert!(point["payload"].as_object().unwrap().is_empty());
}

#[test]
fn test_reference_on_empty_history_exits_zero() {
    println!("\n=== TEST: reference with no history ===");
    let db = TestDb::new();
    db.init();

    let report = db
        .run(&["reference", "--vector", "[1.0, 0.0, 0.0]"])
        .assert_success();
    assert_eq!(report["outcome"]["outcome"], "none");
    assert_eq!(report["summary"]["found_match"], false);
    assert_eq!(report["summary"]["document_ref"], "N/A");
    println!("RESULT: PASS");
}

#[test]
fn test_ingest_knowledge_then_reference() {
    println!("\n=== TEST: ingest-knowledge + reference ===");
    let db = TestDb::new();
    db.init();

    let docs = db.write_file(
        "rules.jsonl",
        concat!(
            r#"{"id": "rule-critical", "text": "CRITICAL", "source": "rulebook.txt", "doc_type": "rulebook"}"#,
            "\n",
            r#"{"id": "rule-winter", "text": "Winter operations: reduce speed on snow covered switches.", "source": "manual.txt", "doc_type": "manual"}"#,
            "\n",
        ),
    );
    let ingested = db.run(&["ingest-knowledge", &docs]).assert_success();
    assert_eq!(ingested["collection"], "railway_knowledge");
    assert_eq!(ingested["inserted"], 2);
    assert_eq!(ingested["embedded"], 2);
    assert_eq!(ingested["total"], 2);

    let e0 = db.vector_file("e0.json", &unit_vector(OFFLINE_DIM, 0));
    db.run(&[
        "upsert",
        "--id",
        "crack_01.jpg",
        "--vector-file",
        &e0,
        "--payload",
        r#"{"filename": "crack_01.jpg", "status": "CRITICAL", "recommended_action": "STOP_TRAIN"}"#,
    ])
    .assert_success();

    let report = db
        .run(&["reference", "--fidelity", "low", "--vector-file", &e0])
        .assert_success();
    let case = &report["outcome"]["case"];
    assert_eq!(report["outcome"]["outcome"], "found");
    assert_eq!(case["problem_type"], "CRITICAL");
    assert_eq!(case["solution"], "STOP_TRAIN");
    assert_eq!(case["rules"], "CRITICAL");
    assert_eq!(case["file_ref"], "crack_01.jpg");

    let summary = &report["summary"];
    assert_eq!(summary["found_match"], true);
    assert_eq!(summary["reference_solution"], "STOP_TRAIN");
    assert_eq!(summary["document_ref"], "crack_01.jpg");
    println!("RESULT: PASS");
}
