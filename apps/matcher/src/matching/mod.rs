// Matching engine: TF-IDF scoring, top-K ranking and the worker × job graph.
// Pure functions over in-memory records; persistence lives in `records`.

pub mod engine;
pub mod graph;
pub mod handlers;
pub mod render;
pub mod tfidf;
