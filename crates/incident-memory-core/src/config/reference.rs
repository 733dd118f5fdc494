//! Reference-case composition settings.
//!
//! Both thresholds are tunables. Their defaults (0.7, 0.5) come from field practice and
//! are not statistically validated.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_confident_match_threshold() -> f32 {
    0.7
}

fn default_knowledge_relevance_threshold() -> f32 {
    0.5
}

fn default_knowledge_k() -> usize {
    2
}

fn default_embed_timeout_ms() -> u64 {
    2_000
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_problem() -> String {
    "Unclassified track anomaly".to_string()
}

fn default_solution() -> String {
    "Refer to maintenance manual.".to_string()
}

fn default_rules() -> String {
    "Apply standard inspection protocol.".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// A case scoring strictly above this is a confident historical match.
    #[serde(default = "default_confident_match_threshold")]
    pub confident_match_threshold: f32,

    /// Knowledge hits must score strictly above this to be kept.
    #[serde(default = "default_knowledge_relevance_threshold")]
    pub knowledge_relevance_threshold: f32,

    /// Knowledge documents fetched per composition.
    #[serde(default = "default_knowledge_k")]
    pub knowledge_k: usize,

    #[serde(default = "default_embed_timeout_ms")]
    pub embed_timeout_ms: u64,

    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    #[serde(default = "default_problem")]
    pub default_problem: String,

    #[serde(default = "default_solution")]
    pub default_solution: String,

    #[serde(default = "default_rules")]
    pub default_rules: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            confident_match_threshold: default_confident_match_threshold(),
            knowledge_relevance_threshold: default_knowledge_relevance_threshold(),
            knowledge_k: default_knowledge_k(),
            embed_timeout_ms: default_embed_timeout_ms(),
            store_timeout_ms: default_store_timeout_ms(),
            default_problem: default_problem(),
            default_solution: default_solution(),
            default_rules: default_rules(),
        }
    }
}

impl ReferenceConfig {
    #[inline]
    pub fn embed_timeout(&self) -> Duration {
        Duration::from_millis(self.embed_timeout_ms)
    }

    #[inline]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("confident_match_threshold", self.confident_match_threshold),
            (
                "knowledge_relevance_threshold",
                self.knowledge_relevance_threshold,
            ),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within [-1, 1], got {value}"));
            }
        }
        if self.knowledge_k == 0 {
            return Err("knowledge_k must be greater than zero".to_string());
        }
        if self.embed_timeout_ms == 0 {
            return Err("embed_timeout_ms must be greater than zero".to_string());
        }
        if self.store_timeout_ms == 0 {
            return Err("store_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}
