//! Embedding providers
//!
//! The engine only sees the [`Embedder`] capability: text in, fixed-length
//! vector out. Two local backends live here:
//!
//! - [`HashEmbedder`]: FNV-1a feature hashing of word tokens. No model files,
//!   fully deterministic, good enough for tag vocabularies where queries reuse
//!   the catalog's own words.
//! - [`TagVocabularyEmbedder`]: multi-hot vector over the catalog's tag
//!   vocabulary, the categorical flavour of the recommender.
//!
//! The remote backend is in [`crate::search::openai`].

use rayon::prelude::*;

use crate::error::{FfcsError, Result};
use crate::utils::{fold, split_tags};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Text-to-vector capability.
///
/// Implementations must be deterministic for a given configuration and safe
/// to share across threads.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, preserving input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.par_iter().map(|text| self.embed(text)).collect()
    }

    /// Output dimension.
    fn dims(&self) -> usize;

    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Hash embedder using FNV-1a
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with specified dimension (at least 1).
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// Embed text into an L2-normalized vector.
    #[must_use]
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            #[allow(clippy::cast_possible_truncation)]
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        normalize(&mut vector);
        vector
    }

    /// Compute cosine similarity between two embeddings
    #[must_use]
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dims(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Multi-hot embedder over a fixed tag vocabulary.
///
/// A text activates every vocabulary entry it names, either as a
/// comma-separated label or as a whitespace-separated word, so both
/// `"chill, project-based"` and `"a chill project-based class"` work.
#[derive(Debug, Clone)]
pub struct TagVocabularyEmbedder {
    vocabulary: Vec<String>,
}

impl TagVocabularyEmbedder {
    /// Build from labels; they are case-folded, sorted and deduplicated.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary: Vec<String> = labels
            .into_iter()
            .map(|label| fold(label.as_ref().trim()))
            .filter(|label| !label.is_empty())
            .collect();
        vocabulary.sort();
        vocabulary.dedup();
        Self { vocabulary }
    }

    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    fn activate(&self, vector: &mut [f32], candidate: &str) {
        if let Ok(pos) = self.vocabulary.binary_search_by(|entry| entry.as_str().cmp(candidate)) {
            vector[pos] = 1.0;
        }
    }
}

impl Embedder for TagVocabularyEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        let folded = fold(text);
        for label in split_tags(&folded) {
            self.activate(&mut vector, label);
            for word in label.split_whitespace() {
                self.activate(&mut vector, word.trim_matches(|c: char| !c.is_alphanumeric()));
            }
        }
        Ok(vector)
    }

    fn dims(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &str {
        "tags"
    }
}

/// Cosine similarity: `dot(a, b) / (|a| |b|)`.
///
/// Returns 0 when the lengths differ or either vector has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Check that a provider honoured its advertised dimension.
pub fn ensure_dims(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(FfcsError::DimensionMismatch {
            expected,
            got: vector.len(),
        })
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(fold)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
