//! Knowledge documents: rules, manuals and incident narratives.

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// A text document with one embedding, read-only once ingested.
///
/// Ids live in their own space, separate from incident ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub text: String,
    /// Origin file of the text.
    #[serde(default)]
    pub source: String,
    /// Document type, e.g. `rulebook`, `manual`, `incident_report`.
    #[serde(default)]
    pub doc_type: String,
    /// Empty until embedded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector: Vec<f32>,
}

impl KnowledgeDocument {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
        doc_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
            doc_type: doc_type.into(),
            vector: Vec::new(),
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = vector;
        self
    }

    /// True if the document still needs an embedding.
    pub fn needs_embedding(&self) -> bool {
        self.vector.is_empty()
    }

    pub fn validate(&self) -> MemoryResult<()> {
        if self.id.is_empty() {
            return Err(MemoryError::InvalidArgument(
                "knowledge document id must not be empty".to_string(),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(MemoryError::InvalidArgument(format!(
                "knowledge document '{}' has no text",
                self.id
            )));
        }
        Ok(())
    }
}

/// One knowledge search result. The vector is not returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub source: String,
    pub doc_type: String,
}

impl KnowledgeHit {
    pub fn from_document(doc: KnowledgeDocument, score: f32) -> Self {
        Self {
            id: doc.id,
            score,
            text: doc.text,
            source: doc.source,
            doc_type: doc.doc_type,
        }
    }
}
