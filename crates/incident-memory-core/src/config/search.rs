//! Retrieval tuning.

use serde::{Deserialize, Serialize};

fn default_oversampling() -> f32 {
    4.0
}

fn default_min_shortlist() -> usize {
    16
}

/// Shortlist sizing for rescored binary search.
///
/// The approximate pass keeps `max(ceil(k * oversampling), min_shortlist)` candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_oversampling")]
    pub oversampling: f32,
    #[serde(default = "default_min_shortlist")]
    pub min_shortlist: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            oversampling: default_oversampling(),
            min_shortlist: default_min_shortlist(),
        }
    }
}

impl SearchConfig {
    /// Number of approximate candidates to rescore for a top-`k` query.
    pub fn shortlist_size(&self, k: usize) -> usize {
        let scaled = (k as f32 * self.oversampling).ceil() as usize;
        scaled.max(self.min_shortlist).max(k)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.oversampling.is_finite() || self.oversampling < 1.0 {
            return Err(format!(
                "oversampling must be >= 1.0, got {}",
                self.oversampling
            ));
        }
        Ok(())
    }
}
