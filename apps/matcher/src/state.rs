use std::sync::Arc;

use crate::matching::engine::MatchingEngine;
use crate::records::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. CSV files under `MATCHER_DATA_DIR`, or memory
    /// with `--in-memory`.
    pub store: Arc<dyn RecordStore>,
    pub engine: MatchingEngine,
}
