use std::sync::Arc;
use std::thread;

use ffcs_buddy::engine::RecommendRequest;

use super::common::{engine_with, names, scenario_catalog, scenario_embedder};

#[test]
fn engine_serves_concurrent_requests() {
    let (engine, _) = engine_with(scenario_catalog(), scenario_embedder());
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let request = if worker % 2 == 0 {
                    RecommendRequest::new().tag("strict")
                } else {
                    RecommendRequest::new().query("a relaxed teacher").top_n(1)
                };
                let results = engine.recommend(&request).expect("recommend");
                names(&results).into_iter().map(str::to_string).collect::<Vec<_>>()
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let names = handle.join().expect("worker");
        if worker % 2 == 0 {
            assert_eq!(names, ["C", "A"]);
        } else {
            assert_eq!(names, ["B"]);
        }
    }
    let stats = engine.query_cache_stats();
    assert_eq!(stats.hits + stats.misses, 4);
}
