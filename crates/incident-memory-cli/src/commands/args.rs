//! Argument groups shared by several commands.

use std::path::PathBuf;

use clap::Args;

use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::types::{Fidelity, Payload, OFFLINE_LANE};
use incident_memory_core::vector::normalize;
use incident_memory_storage::LaneStore;

/// Where to read a vector from.
#[derive(Args, Debug, Clone)]
pub struct VectorArgs {
    /// Vector as a JSON array, e.g. `[0.1, -0.3, 0.7]`
    #[arg(long, conflicts_with = "vector_file", required_unless_present = "vector_file")]
    pub vector: Option<String>,

    /// File containing the vector as a JSON array
    #[arg(long)]
    pub vector_file: Option<PathBuf>,
}

impl VectorArgs {
    pub fn read(&self) -> MemoryResult<Vec<f32>> {
        let text = match (&self.vector, &self.vector_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                MemoryError::InvalidArgument(format!(
                    "cannot read vector file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            (None, None) => {
                return Err(MemoryError::InvalidArgument(
                    "one of --vector or --vector-file is required".to_string(),
                ))
            }
        };
        parse_vector(&text)
    }

    /// Reads the vector and, if `fit`, fits it to the lane declared by the collection
    /// schema. Otherwise the vector is passed through unchanged and the store reports
    /// any dimension mismatch.
    pub fn read_for_lane(
        &self,
        store: &LaneStore,
        collection: &str,
        lane: &str,
        fit: bool,
    ) -> MemoryResult<Vec<f32>> {
        let raw = self.read()?;
        if !fit {
            return Ok(raw);
        }
        let schema = store.collection_schema(collection)?;
        let spec = schema.lane(lane)?;
        normalize(&raw, spec.dim)
    }
}

/// Lane selection by name or by fidelity tier.
#[derive(Args, Debug, Clone)]
pub struct LaneArgs {
    /// Lane name (default: offline_lane)
    #[arg(long, conflicts_with = "fidelity")]
    pub lane: Option<String>,

    /// Fidelity tier whose default lane to use: high | low
    #[arg(long, value_parser = parse_fidelity)]
    pub fidelity: Option<Fidelity>,
}

impl LaneArgs {
    pub fn resolve(&self) -> String {
        match (&self.lane, self.fidelity) {
            (Some(lane), _) => lane.clone(),
            (None, Some(fidelity)) => fidelity.lane_name().to_string(),
            (None, None) => OFFLINE_LANE.to_string(),
        }
    }
}

pub fn parse_fidelity(s: &str) -> Result<Fidelity, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "high" => Ok(Fidelity::High),
        "low" => Ok(Fidelity::Low),
        other => Err(format!("unknown fidelity '{other}', expected high or low")),
    }
}

pub fn parse_vector(text: &str) -> MemoryResult<Vec<f32>> {
    serde_json::from_str::<Vec<f32>>(text.trim())
        .map_err(|e| MemoryError::InvalidArgument(format!("vector must be a JSON array of numbers: {e}")))
}

/// Parses a JSON object; `None` yields an empty payload.
pub fn parse_payload(text: Option<&str>) -> MemoryResult<Payload> {
    let Some(text) = text else {
        return Ok(Payload::new());
    };
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(MemoryError::InvalidArgument(format!(
            "payload must be a JSON object, got {other}"
        ))),
        Err(e) => Err(MemoryError::InvalidArgument(format!(
            "payload is not valid JSON: {e}"
        ))),
    }
}
