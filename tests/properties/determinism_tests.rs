use proptest::prelude::*;

use ffcs_buddy::search::{HashEmbedder, cosine_similarity};

proptest! {
    #[test]
    fn test_hash_embedding_deterministic(text in ".*") {
        let embedder = HashEmbedder::new(64);
        let first = embedder.embed_text(&text);
        let second = embedder.embed_text(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_hash_embedding_length(text in ".*", dim in 1usize..256usize) {
        let embedder = HashEmbedder::new(dim);
        let embedding = embedder.embed_text(&text);
        prop_assert_eq!(embedding.len(), dim);
    }

    #[test]
    fn test_cosine_is_bounded(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
        let embedder = HashEmbedder::new(96);
        let score = cosine_similarity(&embedder.embed_text(&a), &embedder.embed_text(&b));
        prop_assert!((-1.0001..=1.0001).contains(&score));
    }
}
