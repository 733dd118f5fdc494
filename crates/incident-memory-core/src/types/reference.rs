//! Reference case: the best known precedent for a new incident.
//!
//! Composed per query and never persisted.

use serde::{Deserialize, Serialize};

use super::incident::IncidentId;

/// Placeholder `reference_solution` when no confident precedent exists.
pub const NO_MATCH_SOLUTION: &str = "No matching historical case found.";
/// Placeholder `document_ref` when no precedent exists.
pub const NO_MATCH_DOCUMENT: &str = "N/A";

/// Best historical match plus supporting rule text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCase {
    /// Raw cosine similarity of the image match.
    pub score: f32,
    pub problem_type: String,
    pub solution: String,
    /// First relevant rule, or the configured fallback text.
    pub rules: String,
    /// All relevant rules, highest score first. Empty when the knowledge lookup failed.
    pub all_rules: Vec<String>,
    pub file_ref: String,
    pub incident_id: IncidentId,
}

impl ReferenceCase {
    /// True if `score` is strictly above `threshold`.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.score > threshold
    }
}

/// Result of a reference-case query.
///
/// `None` is a normal outcome meaning "no history yet", distinct from an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "case", rename_all = "snake_case")]
pub enum ReferenceOutcome {
    Found(ReferenceCase),
    None,
}

impl ReferenceOutcome {
    pub fn case(&self) -> Option<&ReferenceCase> {
        match self {
            ReferenceOutcome::Found(case) => Some(case),
            ReferenceOutcome::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ReferenceOutcome::None)
    }

    /// Collapses the outcome into the caller-facing summary.
    ///
    /// A found case whose score is at or below `threshold` still reports its score and
    /// solution, but `found_match` is false.
    pub fn summary(&self, threshold: f32) -> ReferenceSummary {
        match self {
            ReferenceOutcome::Found(case) => case.summary(threshold),
            ReferenceOutcome::None => ReferenceSummary {
                found_match: false,
                confidence_score: 0.0,
                reference_solution: NO_MATCH_SOLUTION.to_string(),
                document_ref: NO_MATCH_DOCUMENT.to_string(),
            },
        }
    }
}

impl ReferenceCase {
    pub fn summary(&self, threshold: f32) -> ReferenceSummary {
        ReferenceSummary {
            found_match: self.is_confident(threshold),
            confidence_score: self.score,
            reference_solution: self.solution.clone(),
            document_ref: self.file_ref.clone(),
        }
    }
}

/// Compact answer shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub found_match: bool,
    pub confidence_score: f32,
    pub reference_solution: String,
    pub document_ref: String,
}
