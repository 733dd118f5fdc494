//! Search result types.
//!
//! # Types
//!
//! - [`ScoredPoint`]: one hit with id, score and payload
//! - [`SearchResults`]: ranked hits from one lane plus query metadata
//!
//! # Scores
//!
//! Scores are cosine similarities in [-1, 1]. On a binary lane searched without
//! rescoring the score is the sign-bit estimate `1 - 2 * hamming / dim`; with rescoring
//! it is the exact cosine against the stored f32 vector.

use serde::{Deserialize, Serialize};

use incident_memory_core::types::{IncidentId, Payload};

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: IncidentId,
    /// Similarity to the query, higher is closer.
    pub score: f32,
    pub payload: Payload,
}

/// Ranked hits from one lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits sorted by score descending, at most `k`. Equal Hamming estimates follow
    /// exact cosine, then id.
    pub hits: Vec<ScoredPoint>,

    pub collection: String,

    pub lane: String,

    /// Query k (requested limit).
    pub k: usize,

    /// True if binary candidates were rescored against stored f32 vectors.
    pub rescored: bool,

    /// Vectors scanned in the lane.
    pub candidates: usize,

    /// Search latency in microseconds.
    pub latency_us: u64,
}

impl SearchResults {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Best hit, if any.
    #[inline]
    pub fn top(&self) -> Option<&ScoredPoint> {
        self.hits.first()
    }

    /// Consumes the results and returns the best hit.
    pub fn into_top(self) -> Option<ScoredPoint> {
        self.hits.into_iter().next()
    }

    pub fn ids(&self) -> Vec<IncidentId> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }
}
