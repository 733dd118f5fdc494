//! `ingest-knowledge`: load rule and manual text into the knowledge collection.
//!
//! # Input
//!
//! A JSON array of documents, or one JSON document per line:
//!
//! ```json
//! {"id": "rule-1", "text": "Stop the train on a cracked rail.", "source": "rulebook.txt", "doc_type": "rulebook"}
//! ```
//!
//! Documents without a `vector` are embedded with the local hashing embedder at the
//! knowledge dimension. Supplied vectors are fitted to that dimension.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::stubs::HashingEmbedder;
use incident_memory_core::types::KnowledgeDocument;
use incident_memory_storage::embed_documents;

use super::{emit, CommandContext, GlobalOptions};

#[derive(Args, Debug)]
pub struct IngestKnowledgeArgs {
    /// JSON array or JSON Lines file of knowledge documents
    pub file: PathBuf,
}

#[derive(Serialize)]
struct IngestKnowledgeReport {
    collection: String,
    inserted: usize,
    embedded: usize,
    total: usize,
}

pub async fn ingest_knowledge_command(global: &GlobalOptions, args: IngestKnowledgeArgs) -> i32 {
    emit("ingest-knowledge", run(global, args).await)
}

async fn run(global: &GlobalOptions, args: IngestKnowledgeArgs) -> MemoryResult<IngestKnowledgeReport> {
    let text = std::fs::read_to_string(&args.file).map_err(|e| {
        MemoryError::InvalidArgument(format!(
            "cannot read knowledge file '{}': {}",
            args.file.display(),
            e
        ))
    })?;
    let mut docs = parse_documents(&text)?;

    let ctx = CommandContext::open(global)?;
    let knowledge = ctx.knowledge();
    knowledge.ensure()?;

    let embedder = HashingEmbedder::new(knowledge.dim());
    let embedded = embed_documents(&embedder, &mut docs, knowledge.dim()).await?;
    let inserted = knowledge.insert_documents(&docs)?;
    info!(
        "ingest-knowledge: {} document(s), {} embedded locally",
        inserted, embedded
    );

    Ok(IngestKnowledgeReport {
        collection: knowledge.config().collection.clone(),
        inserted,
        embedded,
        total: knowledge.count()?,
    })
}

/// Accepts a JSON array or JSON Lines; blank lines are skipped.
pub fn parse_documents(text: &str) -> MemoryResult<Vec<KnowledgeDocument>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| {
            MemoryError::InvalidArgument(format!("invalid knowledge document array: {e}"))
        });
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| {
                MemoryError::InvalidArgument(format!("invalid knowledge document on line {}: {e}", n + 1))
            })
        })
        .collect()
}
