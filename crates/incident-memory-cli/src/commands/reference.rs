//! `reference`: compose the reference case for a query vector.
//!
//! # Output
//!
//! ```json
//! {
//!   "outcome": {"outcome": "found", "case": {"score": 0.98, "problem_type": "CRITICAL", ...}},
//!   "summary": {"found_match": true, "confidence_score": 0.98, ...}
//! }
//! ```
//!
//! "No precedent" prints `{"outcome": {"outcome": "none"}, ...}` and exits 0.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tracing::info;

use incident_memory_core::error::MemoryResult;
use incident_memory_core::stubs::HashingEmbedder;
use incident_memory_core::types::{ReferenceOutcome, ReferenceSummary};
use incident_memory_storage::ReferenceCaseComposer;

use super::args::{LaneArgs, VectorArgs};
use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct ReferenceArgs {
    #[command(flatten)]
    pub lane: LaneArgs,

    // Any width: the composer fits the query to the lane.
    #[command(flatten)]
    pub vector: VectorArgs,
}

#[derive(Serialize)]
struct ReferenceReport {
    outcome: ReferenceOutcome,
    summary: ReferenceSummary,
}

pub async fn reference_command(global: &GlobalOptions, args: ReferenceArgs) -> i32 {
    emit("reference", run(global, args).await)
}

async fn run(global: &GlobalOptions, args: ReferenceArgs) -> MemoryResult<ReferenceReport> {
    let ctx = CommandContext::open(global)?;
    let lane = args.lane.resolve();
    let query = args.vector.read()?;

    let composer = ReferenceCaseComposer::new(
        Arc::new(ctx.engine()),
        Arc::new(ctx.knowledge()),
        Arc::new(HashingEmbedder::new(ctx.config.knowledge.dim)),
        ctx.config.images.collection.clone(),
        ctx.config.reference.clone(),
    );

    let outcome = composer.compose(&lane, &query).await?;
    let summary = composer.summarize(&outcome);
    info!(
        "reference: lane={} found_match={} score={:.4}",
        lane, summary.found_match, summary.confidence_score
    );

    Ok(ReferenceReport { outcome, summary })
}
