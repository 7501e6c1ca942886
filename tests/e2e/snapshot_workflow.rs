use ffcs_buddy::app::build_engine;
use ffcs_buddy::config::{Config, EmbeddingBackend};
use ffcs_buddy::engine::RecommendRequest;
use ffcs_buddy::test_utils::UnitTestFixture;
use httpmock::prelude::*;
use serde_json::json;

use super::common::names;

fn config_for(fixture: &UnitTestFixture, backend: EmbeddingBackend) -> Config {
    let mut config = Config::default();
    config.catalog.path = fixture.create_sample_catalog();
    config.embedding.backend = backend;
    config
}

#[test]
fn snapshot_to_recommendation_with_hash_backend() {
    let fixture = UnitTestFixture::new();
    let engine = build_engine(&config_for(&fixture, EmbeddingBackend::Hash)).expect("engine");

    let results = engine
        .recommend(&RecommendRequest::new().course_code("CSE"))
        .expect("recommend");
    assert_eq!(names(&results), ["A", "B"]);

    let results = engine
        .recommend(&RecommendRequest::new().query("chill lenient grading"))
        .expect("recommend");
    assert_eq!(results[0].name, "B");
}

#[test]
fn snapshot_to_recommendation_with_tag_backend() {
    let fixture = UnitTestFixture::new();
    let engine = build_engine(&config_for(&fixture, EmbeddingBackend::Tags)).expect("engine");
    assert_eq!(engine.embeddings().dims(), 4);

    let results = engine
        .recommend(&RecommendRequest::new().query("strict, project-based"))
        .expect("recommend");
    assert_eq!(names(&results), ["A", "C", "B"]);
}

#[test]
fn missing_columns_stop_startup() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file("ffcs_data.csv", "faculty_name,department,rating\nA,SCOPE,8.0\n");
    let mut config = Config::default();
    config.catalog.path = path;

    let err = build_engine(&config).expect_err("missing columns");
    assert_eq!(err.code(), "missing_columns");
    let message = err.to_string();
    for column in ["course_code", "slot", "style_tags"] {
        assert!(message.contains(column), "{message}");
    }
}

#[test]
fn provider_outage_stops_startup() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(503).body("model loading");
    });

    let fixture = UnitTestFixture::new();
    let mut config = config_for(&fixture, EmbeddingBackend::Openai);
    config.embedding.base_url = server.base_url();
    config.embedding.max_retries = 1;

    let err = build_engine(&config).expect_err("provider down");
    assert_eq!(err.code(), "embedding_error");
    assert!(err.to_string().contains("503"));
    mock.assert();
}

#[test]
fn openai_backend_embeds_catalog_through_provider() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(200).json_body(json!({
            "data": [
                {"index": 0, "embedding": [0.0, 1.0]},
                {"index": 1, "embedding": [1.0, 0.0]},
                {"index": 2, "embedding": [0.6, 0.8]}
            ]
        }));
    });

    let fixture = UnitTestFixture::new();
    let mut config = config_for(&fixture, EmbeddingBackend::Openai);
    config.embedding.base_url = server.base_url();
    config.embedding.dims = 2;

    let engine = build_engine(&config).expect("engine");
    assert_eq!(engine.embeddings().len(), 3);
    assert_eq!(engine.embeddings().get(1), Some([1.0f32, 0.0].as_slice()));
    mock.assert();
}
