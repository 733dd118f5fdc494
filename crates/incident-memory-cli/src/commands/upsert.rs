//! `upsert`: write one lane vector and replace the payload of an incident.

use clap::Args;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use incident_memory_core::error::MemoryResult;
use incident_memory_core::types::IncidentId;

use super::args::{parse_payload, LaneArgs, VectorArgs};
use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Incident id; all-digit ids are numeric. A random UUID is used when omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// Target collection (default: the configured image collection)
    #[arg(long)]
    pub collection: Option<String>,

    #[command(flatten)]
    pub lane: LaneArgs,

    #[command(flatten)]
    pub vector: VectorArgs,

    /// Truncate or zero-pad and L2-normalize the vector to the lane dimension
    #[arg(long)]
    pub fit: bool,

    /// Payload as a JSON object; replaces any previous payload
    #[arg(long)]
    pub payload: Option<String>,
}

#[derive(Serialize)]
struct UpsertReport {
    id: IncidentId,
    collection: String,
    lane: String,
    dim: usize,
}

pub async fn upsert_command(global: &GlobalOptions, args: UpsertArgs) -> i32 {
    emit("upsert", run(global, args))
}

fn run(global: &GlobalOptions, args: UpsertArgs) -> MemoryResult<UpsertReport> {
    let ctx = CommandContext::open(global)?;
    let collection = ctx.collection_or_default(args.collection);
    let lane = args.lane.resolve();

    let id = match args.id {
        Some(raw) => raw.parse::<IncidentId>()?,
        None => IncidentId::Text(Uuid::new_v4().to_string()),
    };
    let payload = parse_payload(args.payload.as_deref())?;
    let vector = args.vector.read_for_lane(&ctx.store, &collection, &lane, args.fit)?;

    ctx.store.upsert(&collection, &id, &lane, &vector, &payload)?;
    info!("upsert: {} -> {}/{}", id, collection, lane);

    Ok(UpsertReport {
        id,
        collection,
        lane,
        dim: vector.len(),
    })
}
