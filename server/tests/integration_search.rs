use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ferret_core::persist::save_index;
use ferret_core::{IndexBuilder, TeaserSource};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_index(dir: &std::path::Path) {
    let mut b = IndexBuilder::new();
    b.add_page(
        "http://site.test/rust",
        "Rust Systems",
        "rust rust systems programming",
        "all about rust".into(),
        TeaserSource::Truncated,
    );
    b.add_page(
        "http://site.test/learn",
        "Learning",
        "learning rust slowly",
        "a learning diary".into(),
        TeaserSource::Generated,
    );
    b.add_page(
        "http://site.test/cooking",
        "Cooking",
        "sourdough bread recipes",
        "bread notes".into(),
        TeaserSource::Truncated,
    );
    save_index(dir, &b.finish(), false, "2024-01-01T00:00:00Z".into()).unwrap();
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn make_app() -> (Router, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let index_dir = dir.path().join("index");
    build_tiny_index(&index_dir);
    (ferret_server::build_app(&index_dir).unwrap(), dir)
}

#[tokio::test]
async fn search_returns_ranked_results_with_teasers() {
    let (app, _dir) = make_app();
    let (status, json) = get_json(app, "/search?q=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results[0]["url"], "http://site.test/rust");
    assert_eq!(results[1]["url"], "http://site.test/learn");
    assert_eq!(results[0]["teaser"], "all about rust");
    assert!(results[0]["score"].as_f64().unwrap() > results[1]["score"].as_f64().unwrap());
    assert!(json.get("corrected_query").is_none());
}

#[tokio::test]
async fn misspelled_query_surfaces_did_you_mean() {
    let (app, _dir) = make_app();
    let (status, json) = get_json(app, "/search?q=sourdoug").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["corrected_query"], "sourdough");
    assert_eq!(json["results"][0]["url"], "http://site.test/cooking");
}

#[tokio::test]
async fn empty_query_is_an_empty_result_set() {
    let (app, _dir) = make_app();
    let (status, json) = get_json(app, "/search?q=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn lucky_returns_top_url_or_none_found() {
    let (app, _dir) = make_app();
    let (_, found) = get_json(app, "/lucky?q=rust").await;
    assert_eq!(found["url"], "http://site.test/rust");

    let (app, _dir) = make_app();
    let (_, missing) = get_json(app, "/lucky?q=zzzzzzzzzz").await;
    assert_eq!(missing["none_found"], true);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (app, _dir) = make_app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
