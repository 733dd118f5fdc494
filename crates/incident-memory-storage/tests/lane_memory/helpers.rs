//! Shared setup for lane memory tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use incident_memory_core::config::{ImagesConfig, KnowledgeConfig, ReferenceConfig, SearchConfig};
use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::stubs::HashingEmbedder;
use incident_memory_core::traits::{EmbeddingOutput, EmbeddingProvider};
use incident_memory_core::types::Payload;
use incident_memory_storage::{KnowledgeStore, LaneStore, ReferenceCaseComposer, RetrievalEngine};

pub const OFFLINE_DIM: usize = 768;
pub const FAST_DIM: usize = 1536;
pub const TEXT_DIM: usize = 384;

/// Store, engine and knowledge store over one temp database, with the default image
/// layout (`fast_lane` 1536 exact, `offline_lane` 768 binary) already created.
pub struct TestMemory {
    pub store: Arc<LaneStore>,
    pub engine: Arc<RetrievalEngine>,
    pub knowledge: Arc<KnowledgeStore>,
    pub images: ImagesConfig,
    _temp_dir: TempDir,
}

impl TestMemory {
    pub fn rail(&self) -> &str {
        &self.images.collection
    }

    pub fn composer(
        &self,
        embedder: Arc<dyn EmbeddingProvider>,
        config: ReferenceConfig,
    ) -> ReferenceCaseComposer {
        ReferenceCaseComposer::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.knowledge),
            embedder,
            self.images.collection.clone(),
            config,
        )
    }

    pub fn hashing_composer(&self) -> ReferenceCaseComposer {
        self.composer(
            Arc::new(HashingEmbedder::new(TEXT_DIM)),
            ReferenceConfig::default(),
        )
    }
}

pub fn setup_db() -> TestMemory {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(LaneStore::open(temp_dir.path()).expect("Failed to open store"));

    let images = ImagesConfig::default();
    store
        .ensure_collection(&images.collection, &images.lanes)
        .expect("Failed to create image collection");

    let knowledge = Arc::new(KnowledgeStore::new(
        Arc::clone(&store),
        KnowledgeConfig::default(),
        SearchConfig::default(),
    ));
    knowledge.ensure().expect("Failed to create knowledge collection");

    let engine = Arc::new(RetrievalEngine::new(
        Arc::clone(&store),
        SearchConfig::default(),
    ));

    TestMemory {
        store,
        engine,
        knowledge,
        images,
        _temp_dir: temp_dir,
    }
}

/// `e_i`: 1.0 at index `i`, zeros elsewhere.
pub fn unit_vector(dim: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[i] = 1.0;
    v
}

pub fn random_unit_vector(rng: &mut StdRng, dim: usize) -> Vec<f32> {
    let mut v: Vec<f32> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Unit vector with `positive` random positive components followed by zeros.
///
/// Every such vector of the same shape quantizes to the same sign pattern.
pub fn positive_prefix_vector(rng: &mut StdRng, dim: usize, positive: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    for x in v.iter_mut().take(positive) {
        *x = rng.gen_range(0.05..1.0);
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in &mut v {
        *x /= norm;
    }
    v
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("payload must be a JSON object, got {other}"),
    }
}

/// Embedder whose every call fails.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _content: &str) -> MemoryResult<EmbeddingOutput> {
        Err(MemoryError::EmbeddingFailure(
            "embedding service unreachable".to_string(),
        ))
    }

    fn dimensions(&self) -> usize {
        TEXT_DIM
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

/// Embedder that answers correctly but only after `delay`.
pub struct SlowEmbedder {
    pub delay: Duration,
    pub inner: HashingEmbedder,
}

#[async_trait]
impl EmbeddingProvider for SlowEmbedder {
    async fn embed(&self, content: &str) -> MemoryResult<EmbeddingOutput> {
        tokio::time::sleep(self.delay).await;
        self.inner.embed(content).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        "slow"
    }
}
