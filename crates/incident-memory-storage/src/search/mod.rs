//! Retrieval Engine: top-k cosine search over one lane.
//!
//! # Search modes
//!
//! | Lane | `rescore` | Ranking |
//! |------|-----------|---------|
//! | exact | ignored | exact cosine |
//! | binary | false | Hamming estimate only |
//! | binary | true | Hamming shortlist, then exact cosine on stored f32 vectors |
//!
//! The shortlist holds `max(ceil(k * oversampling), min_shortlist)` candidates; see
//! [`SearchConfig`](incident_memory_core::config::SearchConfig).

mod engine;
mod result;

pub use engine::RetrievalEngine;
pub use result::{ScoredPoint, SearchResults};
