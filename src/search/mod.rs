//! Semantic search plumbing
//!
//! Embedding providers, the per-item embedding cache and the live-query
//! cache. The engine depends on the [`Embedder`] trait only; which backend
//! sits behind it is a configuration decision made here.

use std::sync::Arc;

use tracing::info;

use crate::catalog::Catalog;
use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::Result;

pub mod cache;
pub mod embeddings;
pub mod openai;

pub use cache::{CacheStats, EmbeddingCache, QueryEmbeddingCache};
pub use embeddings::{Embedder, HashEmbedder, TagVocabularyEmbedder, cosine_similarity};
pub use openai::OpenAiEmbedder;

/// Construct the configured embedding backend.
///
/// The tag-vocabulary backend derives its dimensions from the catalog, so the
/// catalog must be loaded first.
pub fn build_embedder(config: &EmbeddingConfig, catalog: &Catalog) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.dims)),
        EmbeddingBackend::Tags => Arc::new(TagVocabularyEmbedder::new(catalog.tag_vocabulary())),
        EmbeddingBackend::Openai => {
            let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
            Arc::new(OpenAiEmbedder::new(
                &api_key,
                &config.base_url,
                &config.model,
                config.dims,
                config.timeout,
                config.max_retries,
                config.batch_size,
            )?)
        }
    };
    info!(backend = embedder.name(), dims = embedder.dims(), "embedding provider ready");
    Ok(embedder)
}
