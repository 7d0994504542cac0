use anyhow::Result;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use ferret_core::{persist, QueryEngine, SearchHit, SharedIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// `/lucky` payload: the top-ranked URL, or an explicit none-found marker.
#[derive(Serialize)]
#[serde(untagged)]
pub enum LuckyResponse {
    Found { url: String },
    NoneFound { none_found: bool },
}

#[derive(Clone)]
pub struct AppState {
    pub index: SharedIndex,
}

/// Load the persisted index and assemble the router. The index is read
/// once at startup; queries only ever touch the published snapshot.
pub fn build_app<P: AsRef<Path>>(index_dir: P) -> Result<Router> {
    let index = persist::load_index(&index_dir)?;
    tracing::info!(
        dir = %index_dir.as_ref().display(),
        num_docs = index.num_docs,
        "index loaded"
    );
    let state = AppState {
        index: SharedIndex::new(index),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/lucky", get(lucky_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let index = state.index.snapshot();
    let outcome = QueryEngine::search(&index, &params.q);
    Json(SearchResponse {
        query: params.q,
        corrected_query: outcome.corrected_query,
        total_hits: outcome.hits.len(),
        results: outcome.hits,
    })
}

async fn lucky_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<LuckyResponse> {
    let index = state.index.snapshot();
    Json(match QueryEngine::lucky(&index, &params.q) {
        Some(url) => LuckyResponse::Found { url },
        None => LuckyResponse::NoneFound { none_found: true },
    })
}
