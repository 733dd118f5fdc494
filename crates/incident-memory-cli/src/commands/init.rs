//! `init`: create the configured collections.

use clap::Args;
use serde::Serialize;
use tracing::info;

use incident_memory_core::error::MemoryResult;
use incident_memory_core::types::CollectionSchema;

use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Only create the image collection
    #[arg(long)]
    pub skip_knowledge: bool,
}

#[derive(Serialize)]
struct InitReport {
    path: String,
    collections: Vec<CollectionSchema>,
}

/// Idempotent: existing collections are left untouched.
pub async fn init_command(global: &GlobalOptions, args: InitArgs) -> i32 {
    emit("init", run(global, &args))
}

fn run(global: &GlobalOptions, args: &InitArgs) -> MemoryResult<InitReport> {
    let ctx = CommandContext::open(global)?;
    let images = &ctx.config.images;

    let mut collections = vec![ctx
        .store
        .ensure_collection(&images.collection, &images.lanes)?
        .as_ref()
        .clone()];
    if !args.skip_knowledge {
        collections.push(ctx.knowledge().ensure()?.as_ref().clone());
    }

    info!("init: {} collection(s) ready", collections.len());
    Ok(InitReport {
        path: ctx.store.path().display().to_string(),
        collections,
    })
}
