//! Local implementations of collaborator traits that need no external service.

mod hashing_embedder;

pub use hashing_embedder::HashingEmbedder;
