use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use parking_lot::RwLock;
use search_core::{Corpus, DocId, SearchHit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Defaults to the corpus's configured top-k.
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub num_terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    /// Searches share the read lock; nothing may index while one runs.
    pub corpus: Arc<RwLock<Corpus>>,
}

pub fn build_app(corpus: Arc<RwLock<Corpus>>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { corpus })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let results = {
        let corpus = state.corpus.read();
        let k = params.k.unwrap_or(corpus.config().top_k).clamp(1, 100);
        corpus.search_top(&params.q, k)
    };
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, hits = results.total_hits, took_s = elapsed.as_secs_f64(), "search");
    Json(SearchResponse {
        query: results.query,
        took_s: elapsed.as_secs_f64(),
        total_hits: results.total_hits,
        results: results.results,
    })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let corpus = state.corpus.read();
    match corpus.get(doc_id) {
        Some(doc) => Ok(Json(serde_json::json!({
            "doc_id": doc.id,
            "url": doc.meta.url,
            "title": doc.meta.title,
            "fetched_at": doc.meta.fetched_at,
            "num_tokens": doc.tokens.len(),
        }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let corpus = state.corpus.read();
    Json(StatsResponse { num_docs: corpus.index().num_docs(), num_terms: corpus.index().num_terms() })
}
