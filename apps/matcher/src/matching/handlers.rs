//! Axum route handlers for ranking and the match graph.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::engine::{rank_top_k, RankedMatch};
use crate::matching::graph::MatchGraph;
use crate::matching::render::render_dot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: String,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<RankedMatch>,
    pub jobs_considered: usize,
}

/// POST /api/v1/matches
///
/// Ranks stored postings for an ad-hoc resume. Nothing is persisted.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.resume.trim().is_empty() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }

    let companies = state.store.companies().await?;
    let k = request.k.unwrap_or(state.engine.top_k);
    let matches = rank_top_k(&request.resume, &companies, k);

    Ok(Json(MatchResponse {
        matches,
        jobs_considered: companies.len(),
    }))
}

async fn current_graph(state: &AppState) -> Result<MatchGraph, AppError> {
    let workers = state.store.workers().await?;
    let companies = state.store.companies().await?;
    Ok(state.engine.graph(&workers, &companies))
}

/// GET /api/v1/graph
pub async fn handle_graph(State(state): State<AppState>) -> Result<Json<MatchGraph>, AppError> {
    Ok(Json(current_graph(&state).await?))
}

/// GET /api/v1/graph/dot
///
/// Same graph as Graphviz DOT, ready for `dot -Tpng`.
pub async fn handle_graph_dot(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let graph = current_graph(&state).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
        render_dot(&graph),
    ))
}
