//! `get`: read one incident.

use std::collections::BTreeMap;

use clap::Args;
use serde::Serialize;

use incident_memory_core::error::MemoryResult;
use incident_memory_core::types::{IncidentId, Payload};

use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Incident id; all-digit ids are numeric
    pub id: String,

    /// Source collection (default: the configured image collection)
    #[arg(long)]
    pub collection: Option<String>,

    /// Include the stored lane vectors
    #[arg(long)]
    pub with_vectors: bool,
}

#[derive(Serialize)]
struct GetReport {
    id: IncidentId,
    payload: Payload,
    lanes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vectors: Option<BTreeMap<String, Vec<f32>>>,
}

pub async fn get_command(global: &GlobalOptions, args: GetArgs) -> i32 {
    emit("get", run(global, args))
}

fn run(global: &GlobalOptions, args: GetArgs) -> MemoryResult<GetReport> {
    let ctx = CommandContext::open(global)?;
    let collection = ctx.collection_or_default(args.collection);
    let id = args.id.parse::<IncidentId>()?;

    let point = ctx.store.get_point(&collection, &id)?;
    Ok(GetReport {
        id: point.id,
        payload: point.payload,
        lanes: point.vectors.keys().cloned().collect(),
        vectors: args.with_vectors.then_some(point.vectors),
    })
}
