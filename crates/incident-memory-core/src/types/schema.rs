//! Collection and lane schema.
//!
//! A schema is fixed when the collection is created and never altered in place.
//! Changing a lane's dimensionality means creating a new collection.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// Similarity metric of a lane. Cosine is the only metric lanes support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
}

/// How a lane stores its vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizationKind {
    /// Full-precision f32 only.
    #[default]
    None,
    /// Sign bits beside the f32 vector; approximate search uses Hamming distance.
    Binary,
}

/// One named vector subspace of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSpec {
    pub name: String,
    pub dim: usize,
    #[serde(default)]
    pub metric: DistanceMetric,
    #[serde(default)]
    pub quantization: QuantizationKind,
}

impl LaneSpec {
    /// Full-precision cosine lane.
    pub fn exact(name: impl Into<String>, dim: usize) -> Self {
        Self {
            name: name.into(),
            dim,
            metric: DistanceMetric::Cosine,
            quantization: QuantizationKind::None,
        }
    }

    /// Binary-quantized cosine lane.
    pub fn binary(name: impl Into<String>, dim: usize) -> Self {
        Self {
            quantization: QuantizationKind::Binary,
            ..Self::exact(name, dim)
        }
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        self.quantization == QuantizationKind::Binary
    }

    /// Fails with `DimensionMismatch` unless `len == self.dim`.
    pub fn check_dim(&self, len: usize) -> MemoryResult<()> {
        if len != self.dim {
            return Err(MemoryError::dimension_mismatch(&self.name, self.dim, len));
        }
        Ok(())
    }
}

/// Persisted description of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub lanes: Vec<LaneSpec>,
    pub created_at: DateTime<Utc>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>, lanes: Vec<LaneSpec>) -> Self {
        Self {
            name: name.into(),
            lanes,
            created_at: Utc::now(),
        }
    }

    /// Looks up a lane by name. Missing lanes are `NotFound`.
    pub fn lane(&self, lane: &str) -> MemoryResult<&LaneSpec> {
        self.lanes.iter().find(|l| l.name == lane).ok_or_else(|| {
            MemoryError::NotFound(format!("lane '{}' in collection '{}'", lane, self.name))
        })
    }

    /// True if both schemas declare the same lanes, ignoring order and creation time.
    pub fn same_lanes(&self, lanes: &[LaneSpec]) -> bool {
        self.lanes.len() == lanes.len() && lanes.iter().all(|l| self.lanes.contains(l))
    }

    /// Rejects empty or NUL-containing names, duplicate lanes and zero dimensions.
    pub fn validate(&self) -> MemoryResult<()> {
        validate_name("collection", &self.name)?;
        if self.lanes.is_empty() {
            return Err(MemoryError::InvalidConfiguration(format!(
                "collection '{}' declares no lanes",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for lane in &self.lanes {
            validate_name("lane", &lane.name)?;
            if lane.dim == 0 {
                return Err(MemoryError::InvalidConfiguration(format!(
                    "lane '{}' has dimension 0",
                    lane.name
                )));
            }
            if !seen.insert(lane.name.as_str()) {
                return Err(MemoryError::InvalidConfiguration(format!(
                    "duplicate lane '{}' in collection '{}'",
                    lane.name, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Names become key prefixes separated by NUL, so NUL is forbidden.
pub fn validate_name(kind: &str, name: &str) -> MemoryResult<()> {
    if name.is_empty() {
        return Err(MemoryError::InvalidConfiguration(format!(
            "{kind} name must not be empty"
        )));
    }
    if name.contains('\0') {
        return Err(MemoryError::InvalidConfiguration(format!(
            "{kind} name '{}' contains NUL",
            name.escape_debug()
        )));
    }
    Ok(())
}
