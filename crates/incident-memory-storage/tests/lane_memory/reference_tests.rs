//! Reference-case composition end to end.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use incident_memory_core::config::ReferenceConfig;
use incident_memory_core::stubs::HashingEmbedder;
use incident_memory_core::types::{
    Fidelity, IncidentId, KnowledgeDocument, Payload, ReferenceOutcome, NO_MATCH_DOCUMENT,
    NO_MATCH_SOLUTION, OFFLINE_LANE,
};
use incident_memory_storage::embed_documents;

use crate::helpers::*;

fn store_critical_incident(mem: &TestMemory) {
    mem.store
        .upsert(
            mem.rail(),
            &IncidentId::from("crack_01.jpg"),
            OFFLINE_LANE,
            &unit_vector(OFFLINE_DIM, 0),
            &payload(json!({
                "filename": "crack_01.jpg",
                "status": "CRITICAL",
                "recommended_action": "STOP_TRAIN"
            })),
        )
        .unwrap();
}

async fn load_rules(mem: &TestMemory) {
    let embedder = HashingEmbedder::new(TEXT_DIM);
    let mut docs = vec![
        // Exactly the problem summary the composer will embed.
        KnowledgeDocument::new("rule-critical", "CRITICAL", "rulebook.txt", "rulebook"),
        KnowledgeDocument::new(
            "rule-winter",
            "Winter operations: reduce speed on snow covered switches.",
            "manual.txt",
            "manual",
        ),
    ];
    embed_documents(&embedder, &mut docs, TEXT_DIM).await.unwrap();
    mem.knowledge.insert_documents(&docs).unwrap();
}

#[tokio::test]
async fn test_empty_collection_yields_no_reference_case() {
    println!("\n=== TEST: compose on empty collection ===");
    let mem = setup_db();
    let composer = mem.hashing_composer();

    let outcome = composer
        .compose(OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0))
        .await
        .expect("empty history is not an error");
    assert_eq!(outcome, ReferenceOutcome::None);

    let summary = composer.summarize(&outcome);
    assert!(!summary.found_match);
    assert_eq!(summary.reference_solution, NO_MATCH_SOLUTION);
    assert_eq!(summary.document_ref, NO_MATCH_DOCUMENT);
    println!("RESULT: PASS");
}

#[tokio::test]
async fn test_full_composition_with_rules() {
    println!("\n=== TEST: compose with knowledge hits ===");
    let mem = setup_db();
    store_critical_incident(&mem);
    load_rules(&mem).await;

    let composer = mem.hashing_composer();
    let outcome = composer
        .compose_for(Fidelity::Low, &unit_vector(OFFLINE_DIM, 0))
        .await
        .unwrap();
    let case = outcome.case().expect("a precedent exists");

    println!("  score={:.4} rules={:?}", case.score, case.all_rules);
    assert!((case.score - 1.0).abs() < 1e-5);
    assert_eq!(case.problem_type, "CRITICAL");
    assert_eq!(case.solution, "STOP_TRAIN");
    assert_eq!(case.file_ref, "crack_01.jpg");
    assert_eq!(case.all_rules.first().map(String::as_str), Some("CRITICAL"));
    assert_eq!(case.rules, "CRITICAL");

    let summary = composer.summarize(&outcome);
    assert!(summary.found_match);
    assert_eq!(summary.reference_solution, "STOP_TRAIN");
    assert_eq!(summary.document_ref, "crack_01.jpg");
    println!("RESULT: PASS");
}

#[tokio::test]
async fn test_knowledge_failure_degrades_to_default_rules() {
    println!("\n=== TEST: failing embedder degrades knowledge only ===");
    let mem = setup_db();
    store_critical_incident(&mem);
    load_rules(&mem).await;

    let composer = mem.composer(Arc::new(FailingEmbedder), ReferenceConfig::default());
    let outcome = composer
        .compose(OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0))
        .await
        .expect("knowledge failure must not abort composition");
    let case = outcome.case().expect("image match still returned");

    assert!(case.all_rules.is_empty());
    assert_eq!(case.rules, ReferenceConfig::default().default_rules);
    assert_eq!(case.solution, "STOP_TRAIN");
    assert!((case.score - 1.0).abs() < 1e-5);
    println!("RESULT: PASS");
}

#[tokio::test]
async fn test_embedding_timeout_degrades_to_default_rules() {
    let mem = setup_db();
    store_critical_incident(&mem);
    load_rules(&mem).await;

    let config = ReferenceConfig {
        embed_timeout_ms: 20,
        ..ReferenceConfig::default()
    };
    let slow = SlowEmbedder {
        delay: Duration::from_millis(500),
        inner: HashingEmbedder::new(TEXT_DIM),
    };
    let composer = mem.composer(Arc::new(slow), config.clone());

    let outcome = composer
        .compose(OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0))
        .await
        .unwrap();
    let case = outcome.case().unwrap();
    assert!(case.all_rules.is_empty());
    assert_eq!(case.rules, config.default_rules);
}

#[tokio::test]
async fn test_missing_knowledge_collection_degrades() {
    let mem = setup_db();
    store_critical_incident(&mem);

    // Knowledge store pointed at a collection that was never created.
    let knowledge = Arc::new(incident_memory_storage::KnowledgeStore::new(
        Arc::clone(&mem.store),
        incident_memory_core::config::KnowledgeConfig {
            collection: "missing_knowledge".to_string(),
            ..Default::default()
        },
        Default::default(),
    ));
    let composer = incident_memory_storage::ReferenceCaseComposer::new(
        Arc::clone(&mem.engine),
        knowledge,
        Arc::new(HashingEmbedder::new(TEXT_DIM)),
        mem.rail(),
        ReferenceConfig::default(),
    );

    let case = composer
        .compose(OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0))
        .await
        .unwrap()
        .case()
        .cloned()
        .unwrap();
    assert!(case.all_rules.is_empty());
}

#[tokio::test]
async fn test_weak_match_is_returned_but_not_confident() {
    let mem = setup_db();
    mem.store
        .upsert(mem.rail(), &IncidentId::from("A"), OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0), &Payload::new())
        .unwrap();

    // cosine(query, e0) = 0.6
    let mut query = vec![0.0; OFFLINE_DIM];
    query[0] = 0.6;
    query[1] = 0.8;

    let composer = mem.hashing_composer();
    let outcome = composer.compose(OFFLINE_LANE, &query).await.unwrap();
    let case = outcome.case().expect("a case is still returned");
    assert!((case.score - 0.6).abs() < 1e-5);
    assert!(!case.is_confident(composer.config().confident_match_threshold));

    let summary = composer.summarize(&outcome);
    assert!(!summary.found_match);
    assert!((summary.confidence_score - 0.6).abs() < 1e-5);
    assert_eq!(summary.reference_solution, ReferenceConfig::default().default_solution);
    assert_eq!(summary.document_ref, "A");
}

#[tokio::test]
async fn test_raw_producer_width_is_fitted() {
    let mem = setup_db();
    store_critical_incident(&mem);

    // A 1536-wide query against the 768-wide offline lane: truncated, renormalized.
    let mut raw = vec![0.0; 1536];
    raw[0] = 5.0;
    raw[1000] = 5.0;
    let case = mem
        .hashing_composer()
        .compose(OFFLINE_LANE, &raw)
        .await
        .unwrap()
        .case()
        .cloned()
        .unwrap();
    assert!((case.score - 1.0).abs() < 1e-5);
}
