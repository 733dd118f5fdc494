//! `search`: nearest neighbours in one lane.

use clap::Args;

use incident_memory_core::error::MemoryResult;
use incident_memory_storage::SearchResults;

use super::args::{LaneArgs, VectorArgs};
use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Collection to search (default: the configured image collection)
    #[arg(long)]
    pub collection: Option<String>,

    #[command(flatten)]
    pub lane: LaneArgs,

    #[command(flatten)]
    pub vector: VectorArgs,

    /// Truncate or zero-pad and L2-normalize the vector to the lane dimension
    #[arg(long)]
    pub fit: bool,

    /// Number of results
    #[arg(short, long, default_value_t = 5)]
    pub k: usize,

    /// Rank binary lanes by Hamming similarity only
    #[arg(long)]
    pub no_rescore: bool,
}

pub async fn search_command(global: &GlobalOptions, args: SearchArgs) -> i32 {
    emit("search", run(global, args))
}

fn run(global: &GlobalOptions, args: SearchArgs) -> MemoryResult<SearchResults> {
    let ctx = CommandContext::open(global)?;
    let collection = ctx.collection_or_default(args.collection);
    let lane = args.lane.resolve();
    let query = args.vector.read_for_lane(&ctx.store, &collection, &lane, args.fit)?;

    ctx.engine()
        .search(&collection, &lane, &query, args.k, !args.no_rescore)
}
