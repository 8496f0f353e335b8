pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Records
        .route(
            "/api/v1/companies",
            get(records::handle_list_companies).post(records::handle_add_company),
        )
        .route(
            "/api/v1/workers",
            get(records::handle_list_workers).post(records::handle_add_worker),
        )
        // Matching
        .route("/api/v1/matches", post(matching::handle_match))
        .route("/api/v1/graph", get(matching::handle_graph))
        .route("/api/v1/graph/dot", get(matching::handle_graph_dot))
        .with_state(state)
}
