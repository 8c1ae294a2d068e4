use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parking_lot::RwLock;
use search_core::tokenizer::tokenize;
use search_core::{Corpus, DocMeta, SearchConfig};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn build_tiny_corpus() -> Arc<RwLock<Corpus>> {
    let mut corpus = Corpus::with_config(SearchConfig { top_k: 2 });
    let pages = [
        ("https://en.wikipedia.org/wiki/Pharaoh", "Pharaoh ruled Egypt, an ancient civilization"),
        ("https://en.wikipedia.org/wiki/Dynasty", "Egypt: king, dynasty, ancient"),
        ("https://en.wikipedia.org/wiki/Government", "Modern government structure"),
    ];
    for (url, text) in pages {
        let meta = DocMeta { url: url.to_string(), title: Some(url.rsplit('/').next().unwrap().to_string()), fetched_at: None };
        corpus.add_document(meta, tokenize(text));
    }
    Arc::new(RwLock::new(corpus))
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let app = server::build_app(build_tiny_corpus());

    let (status, json) = call(app, "/search?q=pharaoh%20egypt&k=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    let ids: Vec<u64> = arr.iter().map(|h| h["doc_id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(arr[0]["url"], "https://en.wikipedia.org/wiki/Pharaoh");
    let top = arr[0]["score"].as_f64().unwrap();
    assert!((top - 0.589).abs() < 5e-3);
}

#[tokio::test]
async fn search_defaults_to_configured_top_k() {
    let app = server::build_app(build_tiny_corpus());
    let (status, json) = call(app, "/search?q=egypt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_query_is_not_an_error() {
    let app = server::build_app(build_tiny_corpus());
    let (status, json) = call(app, "/search?q=the%20of").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn doc_lookup() {
    let corpus = build_tiny_corpus();
    let (status, json) = call(server::build_app(corpus.clone()), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], "https://en.wikipedia.org/wiki/Dynasty");
    assert_eq!(json["num_tokens"], 4);

    let (status, json) = call(server::build_app(corpus), "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn stats_and_health() {
    let corpus = build_tiny_corpus();
    let (status, json) = call(server::build_app(corpus.clone()), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_docs"], 3);
    assert_eq!(json["num_terms"], 10);

    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = server::build_app(corpus).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
