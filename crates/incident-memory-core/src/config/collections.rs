//! Image and knowledge collection layouts.

use serde::{Deserialize, Serialize};

use crate::error::MemoryResult;
use crate::types::{CollectionSchema, LaneSpec, FAST_LANE, OFFLINE_LANE};

fn default_images_collection() -> String {
    "rail_safety_logs".to_string()
}

fn default_image_lanes() -> Vec<LaneSpec> {
    vec![
        LaneSpec::exact(FAST_LANE, 1536),
        LaneSpec::binary(OFFLINE_LANE, 768),
    ]
}

/// Multi-lane collection holding incident images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_images_collection")]
    pub collection: String,
    #[serde(default = "default_image_lanes")]
    pub lanes: Vec<LaneSpec>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            collection: default_images_collection(),
            lanes: default_image_lanes(),
        }
    }
}

impl ImagesConfig {
    pub fn schema(&self) -> CollectionSchema {
        CollectionSchema::new(self.collection.clone(), self.lanes.clone())
    }

    pub fn validate(&self) -> MemoryResult<()> {
        self.schema().validate()
    }
}

fn default_knowledge_collection() -> String {
    "railway_knowledge".to_string()
}

fn default_knowledge_lane() -> String {
    "text".to_string()
}

fn default_knowledge_dim() -> usize {
    384
}

/// Single-lane text collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_collection")]
    pub collection: String,
    #[serde(default = "default_knowledge_lane")]
    pub lane: String,
    #[serde(default = "default_knowledge_dim")]
    pub dim: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            collection: default_knowledge_collection(),
            lane: default_knowledge_lane(),
            dim: default_knowledge_dim(),
        }
    }
}

impl KnowledgeConfig {
    pub fn lane_spec(&self) -> LaneSpec {
        LaneSpec::exact(self.lane.clone(), self.dim)
    }

    pub fn schema(&self) -> CollectionSchema {
        CollectionSchema::new(self.collection.clone(), vec![self.lane_spec()])
    }

    pub fn validate(&self) -> MemoryResult<()> {
        self.schema().validate()
    }
}
