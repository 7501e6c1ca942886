use ffcs_buddy::catalog::{Catalog, Item};
use ffcs_buddy::engine::RecommendRequest;
use ffcs_buddy::test_utils::StubEmbedder;

use super::common::{engine_with, names, scenario_catalog, scenario_embedder};

#[test]
fn tag_filter_without_query_ranks_by_rating() {
    let (engine, _) = engine_with(scenario_catalog(), scenario_embedder());
    let results = engine
        .recommend(&RecommendRequest::new().tag("strict").top_n(5))
        .expect("recommend");

    assert_eq!(names(&results), ["C", "A"]);
    assert_eq!(results[0].score, 9.0);
    assert_eq!(results[1].score, 8.0);
}

#[test]
fn relaxed_query_prefers_chill_instructor() {
    let (engine, _) = engine_with(scenario_catalog(), scenario_embedder());
    let results = engine
        .recommend(&RecommendRequest::new().query("a relaxed teacher"))
        .expect("recommend");

    let names = names(&results);
    let b = names.iter().position(|name| *name == "B").expect("B ranked");
    let a = names.iter().position(|name| *name == "A").expect("A ranked");
    assert!(b < a, "B should outrank A, got {names:?}");
    assert!(results.iter().all(|result| (-1.0..=1.0).contains(&result.score)));
}

#[test]
fn course_and_slot_filters_combine() {
    let (engine, _) = engine_with(scenario_catalog(), scenario_embedder());
    let results = engine
        .recommend(&RecommendRequest::new().course_code("cse").slot("a1"))
        .expect("recommend");
    assert_eq!(names(&results), ["A"]);
    assert_eq!(results[0].attributes["slot"], "A1+TA1");
    assert_eq!(results[0].tags, "strict, project-based");
}

#[test]
fn no_query_falls_back_to_rating() {
    let catalog = Catalog::from_items(vec![
        Item::new("item1", "SCOPE", "strict", 9.0),
        Item::new("item2", "SCOPE", "chill", 7.5),
        Item::new("item3", "SCOPE", "engaging", 7.5),
    ]);
    let (engine, embedder) = engine_with(catalog, StubEmbedder::new(3));
    let before = embedder.calls();
    let results = engine.recommend(&RecommendRequest::new()).expect("recommend");

    assert_eq!(names(&results), ["item1", "item2", "item3"]);
    assert_eq!(embedder.calls(), before);
}

#[test]
fn quality_ties_keep_catalog_order() {
    let catalog = Catalog::from_items(vec![
        Item::new("X", "SCOPE", "strict", 7.5),
        Item::new("Y", "SCOPE", "chill", 9.0),
        Item::new("Z", "SCOPE", "engaging", 7.5),
    ]);
    let (engine, _) = engine_with(catalog, StubEmbedder::new(3));
    let results = engine.recommend(&RecommendRequest::new()).expect("recommend");

    assert_eq!(names(&results), ["Y", "X", "Z"]);
    let scores: Vec<f64> = results.iter().map(|result| result.score).collect();
    assert_eq!(scores, [9.0, 7.5, 7.5]);
}

#[test]
fn empty_candidate_set_never_calls_the_provider() {
    let (engine, embedder) = engine_with(scenario_catalog(), scenario_embedder());
    let warmup_calls = embedder.calls();

    let results = engine
        .recommend(
            &RecommendRequest::new()
                .course_code("PHY9999")
                .query("a relaxed teacher"),
        )
        .expect("recommend");

    assert!(results.is_empty());
    assert_eq!(embedder.calls(), warmup_calls);
}

#[test]
fn top_n_truncates_the_ranked_list() {
    let catalog = Catalog::from_items(
        [6.0, 9.5, 7.0, 8.0, 5.5]
            .into_iter()
            .enumerate()
            .map(|(index, rating)| Item::new(format!("F{index}"), "SCOPE", "strict", rating))
            .collect(),
    );
    let (engine, _) = engine_with(catalog, StubEmbedder::new(3));

    let results = engine
        .recommend(&RecommendRequest::new().top_n(2))
        .expect("recommend");
    assert_eq!(names(&results), ["F1", "F3"]);
}

#[test]
fn zero_top_n_returns_nothing_without_embedding() {
    let (engine, embedder) = engine_with(scenario_catalog(), scenario_embedder());
    let before = embedder.calls();
    let results = engine
        .recommend(&RecommendRequest::new().query("a relaxed teacher").top_n(0))
        .expect("recommend");
    assert!(results.is_empty());
    assert_eq!(embedder.calls(), before);
}
