//! Hybrid filter-and-rank recommendation engine
//!
//! A [`Recommender`] owns the catalog, the index-aligned embedding cache and
//! the embedding provider. It is built once at startup and shared behind an
//! `Arc`; every request works on its own candidate list and scores, so
//! concurrent calls need no coordination.
//!
//! Request flow: filter (index-preserving narrowing) → rank (semantic when a
//! query is present, quality score otherwise) → truncate to `top_n`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::search::embeddings::ensure_dims;
use crate::search::{CacheStats, Embedder, EmbeddingCache, QueryEmbeddingCache};
use crate::utils::is_blank;

pub mod filter;
pub mod rank;

pub use filter::Predicate;
pub use rank::Ranked;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_TOP_N: i64 = 10;

/// Capacity of the live-query embedding cache unless configured otherwise.
pub const DEFAULT_QUERY_CACHE: usize = 256;

/// How a request's candidates are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Cosine similarity between the query and each item's tag embedding
    Semantic,
    /// The item's quality score
    Quality,
}

/// One recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    /// Ordered `(attribute, value)` substring filters.
    pub attributes: Vec<(String, String)>,
    /// Tags every result must carry.
    pub tags: Vec<String>,
    /// Free-text query; blank means absent.
    pub query: Option<String>,
    /// Maximum number of results; negative values yield nothing.
    pub top_n: i64,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            tags: Vec::new(),
            query: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl RecommendRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn course_code(self, value: impl Into<String>) -> Self {
        self.attribute("course_code", value)
    }

    #[must_use]
    pub fn slot(self, value: impl Into<String>) -> Self {
        self.attribute("slot", value)
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n;
        self
    }

    /// Filter predicates in application order: attributes, then tags.
    /// Blank values are dropped.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(name, value)| Predicate::attribute(name.as_str(), value));
        let tags = self.tags.iter().filter_map(|tag| Predicate::tag(tag));
        attributes.chain(tags).collect()
    }

    /// The query when present and non-blank.
    #[must_use]
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|query| !is_blank(query))
    }

    #[must_use]
    pub fn mode(&self) -> RankingMode {
        if self.query_text().is_some() {
            RankingMode::Semantic
        } else {
            RankingMode::Quality
        }
    }

    /// `top_n` clamped to a usable length.
    #[must_use]
    pub fn limit(&self) -> usize {
        usize::try_from(self.top_n).unwrap_or(0)
    }
}

/// A ranked item as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResult {
    /// Position in the catalog snapshot.
    pub index: usize,
    pub name: String,
    pub department: String,
    pub attributes: BTreeMap<String, String>,
    pub quality_score: f64,
    /// Tags joined for display.
    pub tags: String,
    /// Similarity in semantic mode, quality score otherwise.
    pub score: f64,
}

/// The recommendation engine.
pub struct Recommender {
    catalog: Catalog,
    embeddings: EmbeddingCache,
    embedder: Arc<dyn Embedder>,
    query_cache: QueryEmbeddingCache,
}

impl Recommender {
    /// Build the engine, embedding every catalog item once.
    pub fn new(catalog: Catalog, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let embeddings = EmbeddingCache::build(&catalog, embedder.as_ref())?;
        Ok(Self {
            catalog,
            embeddings,
            embedder,
            query_cache: QueryEmbeddingCache::new(DEFAULT_QUERY_CACHE),
        })
    }

    /// Replace the live-query cache; 0 disables it.
    #[must_use]
    pub fn with_query_cache(mut self, capacity: usize) -> Self {
        self.query_cache = QueryEmbeddingCache::new(capacity);
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn embeddings(&self) -> &EmbeddingCache {
        &self.embeddings
    }

    #[must_use]
    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    #[must_use]
    pub fn query_cache_stats(&self) -> CacheStats {
        self.query_cache.stats()
    }

    /// Filter stage.
    #[must_use]
    pub fn filter(&self, predicates: &[Predicate]) -> Vec<usize> {
        filter::apply(&self.catalog, predicates)
    }

    /// Ranking stage. A blank query falls back to quality ordering.
    /// Candidates outside the catalog are dropped in both modes.
    pub fn rank(&self, candidates: &[usize], query: Option<&str>) -> Result<Vec<Ranked>> {
        let Some(query) = query.filter(|q| !is_blank(q)) else {
            debug!(candidates = candidates.len(), "ranking by quality score");
            return Ok(rank::by_quality(&self.catalog, candidates));
        };

        let query_vector = self
            .query_cache
            .get_or_embed(query, |text| self.embedder.embed(text))?;
        ensure_dims(self.embeddings.dims(), &query_vector)?;

        debug!(candidates = candidates.len(), "ranking by semantic similarity");
        let vectors = self.embeddings.vectors_for(candidates);
        Ok(rank::by_similarity(&query_vector, &vectors))
    }

    /// Filter, rank and truncate.
    ///
    /// An empty candidate set returns immediately without touching the
    /// embedding provider.
    pub fn recommend(&self, request: &RecommendRequest) -> Result<Vec<ItemResult>> {
        let limit = request.limit();
        let candidates = self.filter(&request.predicates());
        if candidates.is_empty() || limit == 0 {
            debug!(candidates = candidates.len(), limit, "nothing to rank");
            return Ok(Vec::new());
        }

        let mut ranked = self.rank(&candidates, request.query_text())?;
        ranked.truncate(limit);

        Ok(ranked
            .into_iter()
            .filter_map(|Ranked { index, score }| {
                self.catalog.get(index).map(|item| ItemResult {
                    index,
                    name: item.name.clone(),
                    department: item.department.clone(),
                    attributes: item.attributes.clone(),
                    quality_score: item.quality_score,
                    tags: item.tags_display(),
                    score,
                })
            })
            .collect())
    }
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("items", &self.catalog.len())
            .field("dims", &self.embeddings.dims())
            .field("backend", &self.embedder.name())
            .field("query_cache", &self.query_cache)
            .finish()
    }
}
