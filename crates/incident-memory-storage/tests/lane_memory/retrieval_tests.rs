//! Search round trips and argument errors.

use serde_json::json;

use incident_memory_core::config::SearchConfig;
use incident_memory_core::error::MemoryError;
use incident_memory_core::types::{IncidentId, Payload, FAST_LANE, OFFLINE_LANE};
use incident_memory_core::vector::cosine_similarity;
use incident_memory_storage::PointWrite;

use crate::helpers::*;

#[test]
fn test_offline_lane_unit_vector_scenario() {
    println!("\n=== TEST: offline lane e0 self-match ===");
    let mem = setup_db();
    let e0 = unit_vector(OFFLINE_DIM, 0);

    mem.store
        .upsert(
            mem.rail(),
            &IncidentId::from("A"),
            OFFLINE_LANE,
            &e0,
            &payload(json!({"status": "CRITICAL", "recommended_action": "STOP_TRAIN"})),
        )
        .unwrap();

    for rescore in [true, false] {
        let results = mem.engine.search(mem.rail(), OFFLINE_LANE, &e0, 1, rescore).unwrap();
        assert_eq!(results.len(), 1);
        let top = results.top().unwrap();
        println!("  rescore={rescore}: id={} score={:.6}", top.id, top.score);
        assert_eq!(top.id, IncidentId::from("A"));
        assert!((top.score - 1.0).abs() < 1e-5);
        assert_eq!(top.payload["status"], "CRITICAL");
        assert_eq!(results.rescored, rescore);
    }
    println!("RESULT: PASS");
}

#[test]
fn test_self_match_round_trip_both_lanes() {
    println!("\n=== TEST: self-match round trip over random vectors ===");
    let mem = setup_db();
    let mut rng = seeded_rng(7);

    let offline: Vec<Vec<f32>> = (0..40).map(|_| random_unit_vector(&mut rng, OFFLINE_DIM)).collect();
    let fast: Vec<Vec<f32>> = (0..40).map(|_| random_unit_vector(&mut rng, FAST_DIM)).collect();

    let offline_points: Vec<PointWrite> = offline
        .iter()
        .enumerate()
        .map(|(i, v)| PointWrite::new(i as u64, v.clone(), payload(json!({"n": i}))))
        .collect();
    mem.store.upsert_batch(mem.rail(), OFFLINE_LANE, &offline_points).unwrap();
    for (i, v) in fast.iter().enumerate() {
        mem.store
            .upsert(mem.rail(), &IncidentId::Num(i as u64), FAST_LANE, v, &payload(json!({"n": i})))
            .unwrap();
    }

    for (i, v) in offline.iter().enumerate() {
        for rescore in [true, false] {
            let results = mem.engine.search(mem.rail(), OFFLINE_LANE, v, 3, rescore).unwrap();
            let top = results.top().unwrap();
            assert_eq!(top.id, IncidentId::Num(i as u64), "offline self-match, rescore={rescore}");
            assert!((top.score - 1.0).abs() < 1e-4, "score {}", top.score);
        }
    }
    for (i, v) in fast.iter().enumerate() {
        let results = mem.engine.search(mem.rail(), FAST_LANE, v, 3, false).unwrap();
        let top = results.top().unwrap();
        assert_eq!(top.id, IncidentId::Num(i as u64));
        assert!((top.score - 1.0).abs() < 1e-4);
    }
    println!("RESULT: PASS");
}

#[test]
fn test_self_match_with_shared_sign_pattern() {
    println!("\n=== TEST: self-match when every point has the same Hamming estimate ===");
    let mem = setup_db();
    let mut rng = seeded_rng(19);

    // More points than the rescore shortlist, all quantizing to one sign pattern.
    let count = SearchConfig::default().min_shortlist + 4;
    let vectors: Vec<Vec<f32>> = (0..count)
        .map(|_| positive_prefix_vector(&mut rng, OFFLINE_DIM, 128))
        .collect();
    let points: Vec<PointWrite> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| PointWrite::new(i as u64, v.clone(), payload(json!({"n": i}))))
        .collect();
    mem.store.upsert_batch(mem.rail(), OFFLINE_LANE, &points).unwrap();

    for (i, v) in vectors.iter().enumerate() {
        for rescore in [true, false] {
            let results = mem.engine.search(mem.rail(), OFFLINE_LANE, v, 1, rescore).unwrap();
            let top = results.top().unwrap();
            assert_eq!(
                top.id,
                IncidentId::Num(i as u64),
                "point {i} must match itself, rescore={rescore}"
            );
            assert!((top.score - 1.0).abs() < 1e-4, "score {}", top.score);
            assert_eq!(top.payload["n"], i);
        }
    }

    // Without rescoring, equal estimates are ordered by exact cosine.
    let query = &vectors[count - 1];
    let results = mem.engine.search(mem.rail(), OFFLINE_LANE, query, 5, false).unwrap();
    let exact: Vec<f32> = results
        .hits
        .iter()
        .map(|hit| {
            let IncidentId::Num(n) = hit.id else {
                panic!("unexpected id {}", hit.id)
            };
            cosine_similarity(query, &vectors[n as usize])
        })
        .collect();
    assert!(results.hits.iter().all(|hit| (hit.score - 1.0).abs() < 1e-6));
    for pair in exact.windows(2) {
        assert!(pair[0] >= pair[1], "tied estimates must follow exact cosine: {exact:?}");
    }
    println!("RESULT: PASS");
}

#[test]
fn test_results_sorted_and_bounded_by_k() {
    let mem = setup_db();
    let mut rng = seeded_rng(11);
    let vectors: Vec<Vec<f32>> = (0..30).map(|_| random_unit_vector(&mut rng, OFFLINE_DIM)).collect();
    let points: Vec<PointWrite> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| PointWrite::new(i as u64, v.clone(), Payload::new()))
        .collect();
    mem.store.upsert_batch(mem.rail(), OFFLINE_LANE, &points).unwrap();

    let query = random_unit_vector(&mut rng, OFFLINE_DIM);
    for rescore in [true, false] {
        let results = mem.engine.search(mem.rail(), OFFLINE_LANE, &query, 5, rescore).unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results.candidates, 30);
        for pair in results.hits.windows(2) {
            assert!(pair[0].score >= pair[1].score, "hits must be sorted descending");
        }
    }

    // Rescored scores are exact cosines against the stored vectors.
    let rescored = mem.engine.search(mem.rail(), OFFLINE_LANE, &query, 5, true).unwrap();
    for hit in &rescored.hits {
        let IncidentId::Num(n) = hit.id else {
            panic!("unexpected id {}", hit.id)
        };
        let exact = cosine_similarity(&query, &vectors[n as usize]);
        assert!((hit.score - exact).abs() < 1e-5);
    }
}

#[test]
fn test_rescore_recovers_exact_best_match() {
    let mem = setup_db();

    // Same sign pattern as the query, but a poor cosine.
    let mut decoy = vec![0.001; OFFLINE_DIM];
    decoy[0] = 1.0;
    // Different sign pattern on many components, but the best exact match.
    let mut query = vec![0.0; OFFLINE_DIM];
    query[0] = 1.0;
    query[1] = 0.9;
    for x in query.iter_mut().skip(2) {
        *x = 0.0001;
    }
    let mut best = query.clone();
    for x in best.iter_mut().skip(2).step_by(2) {
        *x = -0.0001;
    }

    mem.store
        .upsert(mem.rail(), &IncidentId::from("decoy"), OFFLINE_LANE, &decoy, &Payload::new())
        .unwrap();
    mem.store
        .upsert(mem.rail(), &IncidentId::from("best"), OFFLINE_LANE, &best, &Payload::new())
        .unwrap();

    let approx = mem.engine.search(mem.rail(), OFFLINE_LANE, &query, 1, false).unwrap();
    assert_eq!(approx.top().unwrap().id, IncidentId::from("decoy"));

    let exact = mem.engine.search(mem.rail(), OFFLINE_LANE, &query, 1, true).unwrap();
    assert_eq!(exact.top().unwrap().id, IncidentId::from("best"));
}

#[test]
fn test_empty_lane_returns_empty() {
    let mem = setup_db();
    let results = mem
        .engine
        .search(mem.rail(), FAST_LANE, &unit_vector(FAST_DIM, 0), 5, true)
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(results.candidates, 0);
}

#[test]
fn test_lanes_are_independent_indexes() {
    let mem = setup_db();
    mem.store
        .upsert(mem.rail(), &IncidentId::from("A"), OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 0), &Payload::new())
        .unwrap();

    let results = mem
        .engine
        .search(mem.rail(), FAST_LANE, &unit_vector(FAST_DIM, 0), 5, false)
        .unwrap();
    assert!(results.is_empty(), "fast lane must not see offline vectors");
}

#[test]
fn test_argument_errors() {
    let mem = setup_db();
    let q = unit_vector(OFFLINE_DIM, 0);

    let err = mem.engine.search(mem.rail(), OFFLINE_LANE, &q, 0, true).unwrap_err();
    assert!(matches!(err, MemoryError::InvalidArgument(_)));

    let err = mem
        .engine
        .search(mem.rail(), OFFLINE_LANE, &unit_vector(FAST_DIM, 0), 1, true)
        .unwrap_err();
    assert!(matches!(
        err,
        MemoryError::DimensionMismatch { expected: OFFLINE_DIM, actual: FAST_DIM, .. }
    ));
    assert!(err.is_programmer_error());

    let err = mem.engine.search("no_such_collection", OFFLINE_LANE, &q, 1, true).unwrap_err();
    assert!(matches!(err, MemoryError::CollectionNotFound(_)));

    let err = mem.engine.search(mem.rail(), "thermal_lane", &q, 1, true).unwrap_err();
    assert!(matches!(err, MemoryError::NotFound(_)));

    let mut nan = q.clone();
    nan[5] = f32::NAN;
    let err = mem.engine.search(mem.rail(), OFFLINE_LANE, &nan, 1, true).unwrap_err();
    assert!(matches!(err, MemoryError::InvalidArgument(_)));
}

#[test]
fn test_search_survives_reopen() {
    let tmp = tempfile::TempDir::new().unwrap();
    let images = incident_memory_core::config::ImagesConfig::default();
    {
        let store = incident_memory_storage::LaneStore::open(tmp.path()).unwrap();
        store.ensure_collection(&images.collection, &images.lanes).unwrap();
        store
            .upsert(
                &images.collection,
                &IncidentId::from("snow_02.jpg"),
                OFFLINE_LANE,
                &unit_vector(OFFLINE_DIM, 4),
                &payload(json!({"status": "WARNING"})),
            )
            .unwrap();
    }

    let store = std::sync::Arc::new(incident_memory_storage::LaneStore::open(tmp.path()).unwrap());
    let engine = incident_memory_storage::RetrievalEngine::new(store, Default::default());
    let results = engine
        .search(&images.collection, OFFLINE_LANE, &unit_vector(OFFLINE_DIM, 4), 1, true)
        .unwrap();
    assert_eq!(results.top().unwrap().id, IncidentId::from("snow_02.jpg"));
    assert_eq!(results.top().unwrap().payload["status"], "WARNING");
}
