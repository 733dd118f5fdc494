//! Configuration loading and store opening shared by every command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{debug, info};

use incident_memory_core::config::MemoryConfig;
use incident_memory_core::error::MemoryResult;
use incident_memory_storage::{KnowledgeStore, LaneStore, RetrievalEngine};

/// Options accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true, env = "INCIDENT_MEMORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to RocksDB database directory (overrides `storage.path`)
    #[arg(long, global = true, env = "INCIDENT_MEMORY_DB_PATH")]
    pub db_path: Option<PathBuf>,
}

impl GlobalOptions {
    /// File or defaults, then `INCIDENT_MEMORY_*` overrides, then `--db-path`, then
    /// validation.
    pub fn load_config(&self) -> MemoryResult<MemoryConfig> {
        let config = match &self.config {
            Some(path) => {
                debug!("loading config from {}", path.display());
                MemoryConfig::from_file(path)?
            }
            None => MemoryConfig::default(),
        };

        let mut config = config.with_env_overrides();
        if let Some(db_path) = &self.db_path {
            config.storage.path = db_path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// An open store plus the configuration it was opened with.
pub struct CommandContext {
    pub config: MemoryConfig,
    pub store: Arc<LaneStore>,
}

impl CommandContext {
    pub fn open(global: &GlobalOptions) -> MemoryResult<Self> {
        let config = global.load_config()?;
        let store = Arc::new(LaneStore::from_config(&config)?);
        info!("opened incident memory at {}", store.path().display());
        Ok(Self { config, store })
    }

    pub fn engine(&self) -> RetrievalEngine {
        RetrievalEngine::new(Arc::clone(&self.store), self.config.search.clone())
    }

    pub fn knowledge(&self) -> KnowledgeStore {
        KnowledgeStore::new(
            Arc::clone(&self.store),
            self.config.knowledge.clone(),
            self.config.search.clone(),
        )
    }

    /// `--collection` if given, else the configured image collection.
    pub fn collection_or_default(&self, collection: Option<String>) -> String {
        collection.unwrap_or_else(|| self.config.images.collection.clone())
    }
}
