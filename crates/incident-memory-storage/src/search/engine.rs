//! Brute-force lane search over a RocksDB snapshot.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use incident_memory_core::config::SearchConfig;
use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::types::{IncidentId, LaneSpec};
use incident_memory_core::vector::{cosine_similarity, first_non_finite, BinaryVector};

use super::result::{ScoredPoint, SearchResults};
use crate::lane_store::{LaneReader, LaneStore};

/// Nearest-neighbor search over one lane of a collection.
///
/// Every query scans the lane's vectors through a snapshot, so results never mix two
/// writes to the same point.
///
/// # Thread Safety
///
/// Stateless apart from the shared store. Safe to call from many threads at once.
///
/// # Example
///
/// ```ignore
/// let engine = RetrievalEngine::new(store, SearchConfig::default());
/// let results = engine.search("rail_safety_logs", "offline_lane", &query, 5, true)?;
/// if let Some(best) = results.top() {
///     println!("{} scored {:.3}", best.id, best.score);
/// }
/// ```
pub struct RetrievalEngine {
    store: Arc<LaneStore>,
    config: SearchConfig,
}

impl RetrievalEngine {
    pub fn new(store: Arc<LaneStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<LaneStore> {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Top-`k` points of `lane` by cosine similarity to `query`.
    ///
    /// `rescore` only matters for binary lanes: `true` shortlists by Hamming distance
    /// and re-ranks the shortlist by exact cosine; `false` ranks by the Hamming
    /// estimate, with equal estimates ordered by exact cosine. Exact lanes always rank
    /// by exact cosine. Remaining ties go to the smaller id.
    ///
    /// An empty lane yields empty results, not an error.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `k == 0` or the query has a NaN/Inf component
    /// - `CollectionNotFound` / `NotFound` for a missing collection or lane
    /// - `DimensionMismatch` if `query.len() != dim(lane)`
    /// - `BackendUnavailable` if RocksDB fails or stored data is corrupt
    #[instrument(skip(self, query))]
    pub fn search(
        &self,
        collection: &str,
        lane: &str,
        query: &[f32],
        k: usize,
        rescore: bool,
    ) -> MemoryResult<SearchResults> {
        let start = Instant::now();

        if k == 0 {
            return Err(MemoryError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }

        let schema = self.store.resolve_schema(collection)?;
        let spec = schema.lane(lane)?;
        validate_query(spec, query)?;

        let reader = self.store.reader();
        let binary = spec.is_binary();
        let (ranked, candidates) = if binary {
            self.rank_binary(&reader, collection, spec, query, k, rescore)?
        } else {
            rank_exact(&reader, collection, &spec.name, query, k)?
        };

        let mut hits = Vec::with_capacity(ranked.len());
        for (id, score) in ranked {
            let payload = reader.required_payload(collection, &id)?;
            hits.push(ScoredPoint { id, score, payload });
        }

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            collection,
            lane,
            candidates,
            hits = hits.len(),
            latency_us,
            "Lane search complete"
        );

        Ok(SearchResults {
            hits,
            collection: collection.to_string(),
            lane: lane.to_string(),
            k,
            rescored: binary && rescore,
            candidates,
            latency_us,
        })
    }

    /// Hamming pass, optionally followed by an exact rescore of the shortlist.
    ///
    /// The scan keeps only ids and estimates. Shortlisted vectors are read back from
    /// the same snapshot, so a lane's dense vectors are never all held at once.
    fn rank_binary(
        &self,
        reader: &LaneReader<'_>,
        collection: &str,
        spec: &LaneSpec,
        query: &[f32],
        k: usize,
        rescore: bool,
    ) -> MemoryResult<(Vec<(IncidentId, f32)>, usize)> {
        let query_bits = BinaryVector::from_floats(query);
        let mut approx = Vec::new();
        let candidates = reader.for_each_vector(collection, &spec.name, |id, stored| {
            approx.push((id, query_bits.approximate_cosine(&stored.bits_or_quantize())));
        })?;

        let keep = if rescore {
            self.config.shortlist_size(k)
        } else {
            k
        };
        approx.sort_by(|a, b| by_score_then_id((&a.0, a.1), (&b.0, b.1)));
        approx.truncate(tie_inclusive_cut(&approx, keep));

        let mut shortlist = Vec::with_capacity(approx.len());
        for (id, estimate) in approx {
            let stored = reader.required_vector(collection, &spec.name, &id)?;
            let exact = cosine_similarity(query, &stored.vector);
            shortlist.push(Shortlisted { id, estimate, exact });
        }

        let mut ranked: Vec<(IncidentId, f32)> = if rescore {
            shortlist.sort_by(|a, b| by_score_then_id((&a.id, a.exact), (&b.id, b.exact)));
            shortlist.into_iter().map(|s| (s.id, s.exact)).collect()
        } else {
            shortlist.sort_by(|a, b| {
                b.estimate
                    .partial_cmp(&a.estimate)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| by_score_then_id((&a.id, a.exact), (&b.id, b.exact)))
            });
            shortlist.into_iter().map(|s| (s.id, s.estimate)).collect()
        };
        ranked.truncate(k);
        Ok((ranked, candidates))
    }
}

struct Shortlisted {
    id: IncidentId,
    estimate: f32,
    exact: f32,
}

/// Length of the prefix of `sorted` to keep for a budget of `keep`.
///
/// Hamming estimates collide whenever points share a sign pattern, so every
/// candidate tied with the last kept estimate stays in.
fn tie_inclusive_cut(sorted: &[(IncidentId, f32)], keep: usize) -> usize {
    if keep == 0 || sorted.len() <= keep {
        return sorted.len().min(keep);
    }
    let cutoff = sorted[keep - 1].1;
    keep + sorted[keep..]
        .iter()
        .take_while(|(_, score)| *score == cutoff)
        .count()
}

fn rank_exact(
    reader: &LaneReader<'_>,
    collection: &str,
    lane: &str,
    query: &[f32],
    k: usize,
) -> MemoryResult<(Vec<(IncidentId, f32)>, usize)> {
    let mut scored = Vec::new();
    let candidates = reader.for_each_vector(collection, lane, |id, stored| {
        scored.push((id, cosine_similarity(query, &stored.vector)));
    })?;
    scored.sort_by(|a, b| by_score_then_id((&a.0, a.1), (&b.0, b.1)));
    scored.truncate(k);
    Ok((scored, candidates))
}

/// Score descending, then id ascending.
fn by_score_then_id(a: (&IncidentId, f32), b: (&IncidentId, f32)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(b.0))
}

/// Query must match the lane dimension and be finite.
fn validate_query(spec: &LaneSpec, query: &[f32]) -> MemoryResult<()> {
    spec.check_dim(query.len())?;
    if let Some((i, v)) = first_non_finite(query) {
        return Err(MemoryError::InvalidArgument(format!(
            "query has non-finite component {v} at index {i}"
        )));
    }
    Ok(())
}
