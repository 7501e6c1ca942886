//! Deterministic embedding stub for engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::search::Embedder;

/// Embedder returning fixed vectors for known texts and zeros otherwise.
///
/// Every call is counted so tests can assert when the provider was (or was
/// not) consulted.
#[derive(Debug, Default)]
pub struct StubEmbedder {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register the vector returned for `text`.
    #[must_use]
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Number of `embed` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for StubEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dims]))
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "stub"
    }
}
