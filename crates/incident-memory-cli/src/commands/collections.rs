//! `collections`: list collections with lane point counts.

use serde::Serialize;

use incident_memory_core::error::MemoryResult;
use incident_memory_core::types::QuantizationKind;

use super::{emit, CommandContext, GlobalOptions};

#[derive(Serialize)]
struct LaneReport {
    name: String,
    dim: usize,
    quantization: QuantizationKind,
    points: usize,
}

#[derive(Serialize)]
struct CollectionReport {
    name: String,
    created_at: String,
    lanes: Vec<LaneReport>,
}

pub async fn collections_command(global: &GlobalOptions) -> i32 {
    emit("collections", run(global))
}

fn run(global: &GlobalOptions) -> MemoryResult<Vec<CollectionReport>> {
    let ctx = CommandContext::open(global)?;

    ctx.store
        .list_collections()?
        .into_iter()
        .map(|schema| {
            let lanes = schema
                .lanes
                .iter()
                .map(|lane| {
                    Ok(LaneReport {
                        name: lane.name.clone(),
                        dim: lane.dim,
                        quantization: lane.quantization,
                        points: ctx.store.count(&schema.name, &lane.name)?,
                    })
                })
                .collect::<MemoryResult<Vec<_>>>()?;
            Ok(CollectionReport {
                created_at: schema.created_at.to_rfc3339(),
                name: schema.name,
                lanes,
            })
        })
        .collect()
}
