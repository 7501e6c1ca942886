use ffcs_buddy::search::{Embedder, HashEmbedder, TagVocabularyEmbedder, cosine_similarity};
use ffcs_buddy::test_utils::{TestCase, run_table_tests};

#[test]
fn hash_similarity_orders_by_shared_words() -> Result<(), String> {
    let embedder = HashEmbedder::new(384);
    let cases = vec![
        TestCase {
            name: "identical text",
            input: ("chill lenient grading", "chill lenient grading"),
            expected: true,
            should_panic: false,
        },
        TestCase {
            name: "partial overlap",
            input: ("chill lenient grading", "chill teacher"),
            expected: true,
            should_panic: false,
        },
        TestCase {
            name: "disjoint vocabulary",
            input: ("chill lenient grading", "strict project based"),
            expected: false,
            should_panic: false,
        },
    ];

    run_table_tests(cases, |(left, right)| {
        let a = embedder.embed_text(left);
        let b = embedder.embed_text(right);
        embedder.similarity(&a, &b) > 0.1
    })
}

#[test]
fn hash_embedding_ignores_punctuation_and_case() {
    let embedder = HashEmbedder::new(128);
    assert_eq!(
        embedder.embed_text("Strict, Project-Based"),
        embedder.embed_text("strict project based")
    );
}

#[test]
fn trait_and_inherent_embedding_agree() {
    let embedder = HashEmbedder::new(64);
    let via_trait = embedder.embed("hands-on labs").expect("embed");
    assert_eq!(via_trait, embedder.embed_text("hands-on labs"));
    assert_eq!(embedder.dims(), 64);
    assert_eq!(embedder.name(), "hash");
}

#[test]
fn tag_vocabulary_scores_label_overlap() {
    let embedder = TagVocabularyEmbedder::new(["chill", "lenient-grading", "strict", "project-based"]);
    let chill = embedder.embed("chill,lenient-grading").expect("embed");
    let strict = embedder.embed("strict,project-based").expect("embed");
    let query = embedder.embed("chill").expect("embed");

    assert!(cosine_similarity(&query, &chill) > cosine_similarity(&query, &strict));
    assert_eq!(cosine_similarity(&query, &strict), 0.0);
}
