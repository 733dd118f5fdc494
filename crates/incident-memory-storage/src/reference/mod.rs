//! Reference-Case Composer.
//!
//! Turns a raw query vector into the best historical precedent plus the rules that
//! apply to it:
//!
//! 1. fit the query to the lane width
//! 2. top-1 lane search (absence of history is [`ReferenceOutcome::None`])
//! 3. derive a problem summary from the match payload
//! 4. embed the summary and search the knowledge store
//! 5. keep knowledge hits scoring above the relevance threshold
//! 6. assemble the [`ReferenceCase`]
//!
//! Steps 4-5 are an enhancement. If embedding or knowledge search fails or times out,
//! the failure is logged with `warn!` and the case is returned with no rules. A store
//! failure in step 2 is not swallowed: it surfaces as `BackendUnavailable`.


use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use incident_memory_core::config::ReferenceConfig;
use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::traits::EmbeddingProvider;
use incident_memory_core::types::{
    payload_fields, payload_text, Fidelity, ReferenceCase, ReferenceOutcome, ReferenceSummary,
};
use incident_memory_core::vector::normalize;

use crate::knowledge::KnowledgeStore;
use crate::search::{RetrievalEngine, ScoredPoint};

/// Composes reference cases from the image memory and the knowledge store.
///
/// Holds its collaborators explicitly; there is no global state. Cheap to share behind
/// an `Arc` and safe to call concurrently.
pub struct ReferenceCaseComposer {
    engine: Arc<RetrievalEngine>,
    knowledge: Arc<KnowledgeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
    config: ReferenceConfig,
}

impl ReferenceCaseComposer {
    /// `collection` is the image collection searched in step 2.
    pub fn new(
        engine: Arc<RetrievalEngine>,
        knowledge: Arc<KnowledgeStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
        config: ReferenceConfig,
    ) -> Self {
        Self {
            engine,
            knowledge,
            embedder,
            collection: collection.into(),
            config,
        }
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    /// Best precedent for `query` in `lane`.
    ///
    /// `query` may have any length; it is truncated and renormalized, or zero-padded,
    /// to the lane width first.
    ///
    /// # Errors
    ///
    /// - `CollectionNotFound` / `NotFound` for a missing collection or lane
    /// - `InvalidArgument` if the query has a NaN/Inf component
    /// - `BackendUnavailable` if the store fails or exceeds `store_timeout_ms`
    ///
    /// Knowledge failures never surface here.
    #[instrument(skip(self, query), fields(collection = %self.collection, query_dim = query.len()))]
    pub async fn compose(&self, lane: &str, query: &[f32]) -> MemoryResult<ReferenceOutcome> {
        let Some(best) = self.best_match(lane, query).await? else {
            debug!("No stored incident in lane; no reference case");
            return Ok(ReferenceOutcome::None);
        };

        let payload = &best.payload;
        let problem_type = payload_text(payload, payload_fields::ANALYSIS)
            .or_else(|| payload_text(payload, payload_fields::STATUS))
            .or_else(|| payload_text(payload, payload_fields::DETECTED_ISSUES))
            .unwrap_or_else(|| self.config.default_problem.clone());

        let all_rules = match self.related_rules(&problem_type).await {
            Ok(rules) => rules,
            Err(e) => {
                warn!(
                    error = %e,
                    incident = %best.id,
                    "Knowledge lookup failed; returning reference case without rules"
                );
                Vec::new()
            }
        };

        let rules = all_rules
            .first()
            .cloned()
            .unwrap_or_else(|| self.config.default_rules.clone());
        let solution = payload_text(payload, payload_fields::RECOMMENDED_ACTION)
            .unwrap_or_else(|| self.config.default_solution.clone());
        let file_ref = payload_text(payload, payload_fields::FILENAME)
            .unwrap_or_else(|| best.id.to_string());

        debug!(
            incident = %best.id,
            score = best.score,
            rules = all_rules.len(),
            "Composed reference case"
        );

        Ok(ReferenceOutcome::Found(ReferenceCase {
            score: best.score,
            problem_type,
            solution,
            rules,
            all_rules,
            file_ref,
            incident_id: best.id,
        }))
    }

    /// [`compose`](Self::compose) against the lane of a fidelity tier.
    pub async fn compose_for(
        &self,
        fidelity: Fidelity,
        query: &[f32],
    ) -> MemoryResult<ReferenceOutcome> {
        self.compose(fidelity.lane_name(), query).await
    }

    /// Caller-facing summary using the configured confidence threshold.
    pub fn summarize(&self, outcome: &ReferenceOutcome) -> ReferenceSummary {
        outcome.summary(self.config.confident_match_threshold)
    }

    /// Steps 1-2: fit the query, top-1 search on a blocking thread.
    async fn best_match(&self, lane: &str, query: &[f32]) -> MemoryResult<Option<ScoredPoint>> {
        let engine = Arc::clone(&self.engine);
        let collection = self.collection.clone();
        let lane = lane.to_string();
        let query = query.to_vec();

        self.run_blocking("image search", move || {
            let schema = engine.store().resolve_schema(&collection)?;
            let dim = schema.lane(&lane)?.dim;
            let fitted = normalize(&query, dim)?;
            Ok(engine
                .search(&collection, &lane, &fitted, 1, true)?
                .into_top())
        })
        .await
    }

    /// Steps 4-5. Any error here is swallowed by the caller.
    async fn related_rules(&self, problem: &str) -> MemoryResult<Vec<String>> {
        let timeout = self.config.embed_timeout();
        let output = match tokio::time::timeout(timeout, self.embedder.embed(problem)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(MemoryError::EmbeddingFailure(format!(
                    "embedding timed out after {} ms",
                    timeout.as_millis()
                )))
            }
        };

        let fitted = normalize(&output.vector, self.knowledge.dim())?;
        let knowledge = Arc::clone(&self.knowledge);
        let k = self.config.knowledge_k;
        let hits = self
            .run_blocking("knowledge search", move || {
                knowledge.search_knowledge(&fitted, k)
            })
            .await?;

        let threshold = self.config.knowledge_relevance_threshold;
        Ok(hits
            .into_iter()
            .filter(|hit| hit.score > threshold)
            .map(|hit| hit.text)
            .collect())
    }

    /// Runs a store round trip on the blocking pool under `store_timeout_ms`.
    async fn run_blocking<T, F>(&self, what: &'static str, f: F) -> MemoryResult<T>
    where
        F: FnOnce() -> MemoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let timeout = self.config.store_timeout();
        match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!(what, error = %join_error, "Blocking store task failed");
                Err(MemoryError::BackendUnavailable(format!(
                    "{what} task failed: {join_error}"
                )))
            }
            Err(_) => {
                error!(what, timeout_ms = timeout.as_millis() as u64, "Store call timed out");
                Err(MemoryError::BackendUnavailable(format!(
                    "{what} timed out after {} ms",
                    timeout.as_millis()
                )))
            }
        }
    }
}
