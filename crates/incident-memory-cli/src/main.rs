//! Incident Memory CLI
//!
//! Operator surface over the incident memory library. Every command prints one JSON
//! document to stdout; logs go to stderr.
//!
//! # Commands
//!
//! - `init`: Create the image and knowledge collections from configuration
//! - `collections`: List collections with per-lane point counts
//! - `upsert`: Write one lane vector and the payload of an incident
//! - `get`: Read an incident's payload (and optionally its vectors)
//! - `search`: Nearest neighbours in one lane
//! - `ingest-knowledge`: Load knowledge documents, embedding those without a vector
//! - `reference`: Compose the reference case for a query vector
//!
//! # Exit Codes
//! - 0: Success (a query with no precedent is a success)
//! - 1: Recoverable error
//! - 2: Corrupted store

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

pub use error::{exit_code_for_error, is_corruption_indicator, CliExitCode};

use commands::GlobalOptions;

/// Incident Memory CLI - multi-fidelity incident storage and retrieval
#[derive(Parser)]
#[command(name = "incident-memory")]
#[command(version)]
#[command(about = "Store, search and compose reference cases from incident embeddings")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configured image and knowledge collections
    Init(commands::init::InitArgs),
    /// List collections and lane point counts
    Collections,
    /// Write one lane vector and the payload of an incident
    Upsert(commands::upsert::UpsertArgs),
    /// Read one incident
    Get(commands::get::GetArgs),
    /// Nearest-neighbour search in one lane
    Search(commands::search::SearchArgs),
    /// Load knowledge documents from a JSON file
    IngestKnowledge(commands::knowledge::IngestKnowledgeArgs),
    /// Compose the reference case for a query vector
    Reference(commands::reference::ReferenceArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let global = cli.global;
    let exit_code = match cli.command {
        Commands::Init(args) => commands::init::init_command(&global, args).await,
        Commands::Collections => commands::collections::collections_command(&global).await,
        Commands::Upsert(args) => commands::upsert::upsert_command(&global, args).await,
        Commands::Get(args) => commands::get::get_command(&global, args).await,
        Commands::Search(args) => commands::search::search_command(&global, args).await,
        Commands::IngestKnowledge(args) => {
            commands::knowledge::ingest_knowledge_command(&global, args).await
        }
        Commands::Reference(args) => commands::reference::reference_command(&global, args).await,
    };

    std::process::exit(exit_code);
}
