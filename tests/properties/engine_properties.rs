use std::sync::Arc;

use proptest::prelude::*;

use ffcs_buddy::catalog::{Catalog, Item};
use ffcs_buddy::engine::{Predicate, RecommendRequest, Recommender};
use ffcs_buddy::search::{Embedder, HashEmbedder};

const COURSES: [&str; 4] = ["CSE1004", "CSE2001", "ECE1004", "MAT2002"];
const SLOTS: [&str; 4] = ["A1", "A2", "B1", "C1+TC1"];
const TAGS: [&str; 5] = ["strict", "chill", "lenient-grading", "project-based", "engaging"];
const QUERIES: [&str; 3] = ["a relaxed teacher", "strict project work", "engaging labs"];

fn item_strategy() -> impl Strategy<Value = Item> {
    (
        0usize..COURSES.len(),
        0usize..SLOTS.len(),
        proptest::sample::subsequence(TAGS.to_vec(), 0..=3),
        // Coarse ratings so ties are common.
        0u8..=4,
    )
        .prop_map(|(course, slot, tags, rating)| {
            Item::new("faculty", "SCOPE", tags.join(","), f64::from(rating) * 2.5)
                .with_attribute("course_code", COURSES[course])
                .with_attribute("slot", SLOTS[slot])
        })
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    proptest::collection::vec(item_strategy(), 0..24).prop_map(|items| {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, mut item)| {
                item.name = format!("faculty-{index}");
                item
            })
            .collect();
        Catalog::from_items(items)
    })
}

fn engine(catalog: Catalog) -> Recommender {
    Recommender::new(catalog, Arc::new(HashEmbedder::new(64))).expect("engine")
}

proptest! {
    #[test]
    fn embedding_cache_is_index_aligned(catalog in catalog_strategy()) {
        let embedder = HashEmbedder::new(64);
        let engine = engine(catalog);
        prop_assert_eq!(engine.embeddings().len(), engine.catalog().len());
        for (index, item) in engine.catalog().iter() {
            let cached = engine.embeddings().get(index).expect("cached vector");
            let expected = embedder.embed(&item.tags_text).expect("embed");
            prop_assert_eq!(cached, expected.as_slice());
        }
    }

    #[test]
    fn adding_a_predicate_never_grows_the_candidate_set(
        catalog in catalog_strategy(),
        course in 0usize..COURSES.len(),
        tag in 0usize..TAGS.len(),
    ) {
        let engine = engine(catalog);
        let course = Predicate::attribute("course_code", &COURSES[course][..3]).expect("course");
        let tag = Predicate::tag(TAGS[tag]).expect("tag");

        let everything = engine.filter(&[]);
        let by_course = engine.filter(std::slice::from_ref(&course));
        let by_both = engine.filter(&[course, tag]);

        prop_assert_eq!(everything.len(), engine.catalog().len());
        prop_assert!(by_course.iter().all(|index| everything.contains(index)));
        prop_assert!(by_both.iter().all(|index| by_course.contains(index)));
        prop_assert!(by_both.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn quality_ranking_is_ordered_with_index_tie_break(catalog in catalog_strategy()) {
        let engine = engine(catalog);
        let results = engine.recommend(&RecommendRequest::new().top_n(100)).expect("recommend");

        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.score >= b.score);
            if a.score == b.score {
                prop_assert!(a.index < b.index);
            }
            prop_assert_eq!(a.score, a.quality_score);
        }
    }

    #[test]
    fn semantic_ranking_is_deterministic(
        catalog in catalog_strategy(),
        query in 0usize..QUERIES.len(),
    ) {
        let engine = engine(catalog);
        let request = RecommendRequest::new().query(QUERIES[query]).top_n(100);
        let first = engine.recommend(&request).expect("first");
        let second = engine.recommend(&request).expect("second");
        prop_assert_eq!(&first, &second);

        for pair in first.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].index < pair[1].index);
            }
        }
    }

    #[test]
    fn results_are_truncated_to_top_n(
        catalog in catalog_strategy(),
        top_n in -3i64..30,
        with_query in any::<bool>(),
    ) {
        let engine = engine(catalog);
        let mut request = RecommendRequest::new().top_n(top_n);
        if with_query {
            request = request.query("engaging labs");
        }
        let candidates = engine.filter(&request.predicates()).len();
        let results = engine.recommend(&request).expect("recommend");

        let expected = usize::try_from(top_n).unwrap_or(0).min(candidates);
        prop_assert_eq!(results.len(), expected);
    }
}
