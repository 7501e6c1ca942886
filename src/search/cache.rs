//! Embedding caches.
//!
//! - [`EmbeddingCache`]: one vector per catalog item, computed once at
//!   startup and index-aligned with the catalog. Immutable afterwards.
//! - [`QueryEmbeddingCache`]: bounded LRU of live query embeddings so that a
//!   repeated query does not hit the (possibly remote) provider again.

use std::num::NonZeroUsize;
use std::time::Instant;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{FfcsError, Result};
use crate::search::embeddings::{Embedder, ensure_dims};

/// Precomputed item embeddings, parallel to the catalog.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCache {
    vectors: Vec<Vec<f32>>,
    dims: usize,
}

impl EmbeddingCache {
    /// Embed every item's tag text exactly once.
    pub fn build(catalog: &Catalog, embedder: &dyn Embedder) -> Result<Self> {
        let started = Instant::now();
        let texts: Vec<&str> = catalog
            .iter()
            .map(|(_, item)| item.tags_text.as_str())
            .collect();

        let vectors = embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(FfcsError::Embedding(format!(
                "provider returned {} embeddings for {} items",
                vectors.len(),
                texts.len()
            )));
        }

        let dims = embedder.dims();
        for vector in &vectors {
            ensure_dims(dims, vector)?;
        }

        info!(
            items = vectors.len(),
            dims,
            backend = embedder.name(),
            elapsed_ms = started.elapsed().as_millis(),
            "embedding cache built"
        );
        Ok(Self { vectors, dims })
    }

    /// `(index, vector)` pairs for the given indices, in the requested order.
    /// Indices outside the cache are skipped.
    #[must_use]
    pub fn vectors_for(&self, indices: &[usize]) -> Vec<(usize, &[f32])> {
        indices
            .iter()
            .filter_map(|&i| self.get(i).map(|vector| (i, vector)))
            .collect()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[f32]> {
        self.vectors.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }
}

/// Cache statistics for monitoring and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct QueryCacheInner {
    entries: LruCache<String, Vec<f32>>,
    stats: CacheStats,
}

/// Thread-safe LRU of query embeddings. A capacity of 0 disables caching.
pub struct QueryEmbeddingCache {
    inner: Option<Mutex<QueryCacheInner>>,
}

impl QueryEmbeddingCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let inner = NonZeroUsize::new(capacity).map(|capacity| {
            Mutex::new(QueryCacheInner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            })
        });
        Self { inner }
    }

    /// Return the cached embedding or compute it with `embed`.
    ///
    /// The lock is released while `embed` runs, so two threads racing on the
    /// same new query may both compute it.
    pub fn get_or_embed<F>(&self, query: &str, embed: F) -> Result<Vec<f32>>
    where
        F: FnOnce(&str) -> Result<Vec<f32>>,
    {
        let Some(inner) = &self.inner else {
            return embed(query);
        };

        {
            let mut guard = inner.lock();
            if let Some(vector) = guard.entries.get(query).cloned() {
                guard.stats.hits += 1;
                return Ok(vector);
            }
            guard.stats.misses += 1;
        }

        let vector = embed(query)?;
        inner.lock().entries.put(query.to_string(), vector.clone());
        Ok(vector)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner
            .as_ref()
            .map(|inner| inner.lock().stats)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for QueryEmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEmbeddingCache")
            .field("enabled", &self.inner.is_some())
            .field("len", &self.len())
            .finish()
    }
}
