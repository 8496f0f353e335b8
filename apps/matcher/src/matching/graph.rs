//! Worker × job similarity graph.
//!
//! Nodes are identified by display label, not by stored row. Two postings
//! with the same company name and job type therefore share one node, and a
//! worker's edges to them collapse into a single edge whose score is the one
//! computed for the later row. Each collapse is logged since it silently hides
//! a stored record.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::matching::engine::score_all;
use crate::models::records::{Company, Worker};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub worker: String,
    pub job: String,
    pub score: f64, // rounded to 2 decimals
}

/// Bipartite graph input: two disjoint label sets plus the edges between
/// them. Node lists keep first-seen order so layouts are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchGraph {
    pub worker_nodes: Vec<String>,
    pub job_nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

impl MatchGraph {
    pub fn is_empty(&self) -> bool {
        self.worker_nodes.is_empty() && self.job_nodes.is_empty()
    }
}

pub fn worker_label(worker: &Worker) -> String {
    worker.name.clone()
}

pub fn job_label(job: &Company) -> String {
    format!("{} - {}", job.name, job.job_type)
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn unique_labels(labels: impl Iterator<Item = String>, kind: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    for label in labels {
        if seen.insert(label.clone()) {
            ordered.push(label);
        } else {
            warn!(%label, kind, "records share a graph label; collapsing into one node");
        }
    }
    ordered
}

/// Scores every worker's resume against all job descriptions and keeps the
/// pairs whose similarity is strictly above `threshold`.
///
/// Returns an empty graph when either side has no records.
pub fn build_match_graph(workers: &[Worker], jobs: &[Company], threshold: f64) -> MatchGraph {
    if workers.is_empty() || jobs.is_empty() {
        return MatchGraph::default();
    }

    let job_labels: Vec<String> = jobs.iter().map(job_label).collect();
    let descriptions: Vec<&str> = jobs.iter().map(|job| job.description.as_str()).collect();

    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut edge_slots: BTreeMap<(String, String), usize> = BTreeMap::new();

    for worker in workers {
        let worker_node = worker_label(worker);
        let scores = score_all(&worker.resume, &descriptions);

        for (job_node, score) in job_labels.iter().zip(scores) {
            if score <= threshold {
                continue;
            }

            let edge = GraphEdge {
                worker: worker_node.clone(),
                job: job_node.clone(),
                score: round2(score),
            };

            match edge_slots.get(&(worker_node.clone(), job_node.clone())) {
                Some(&slot) => {
                    warn!(
                        worker = %worker_node,
                        job = %job_node,
                        previous = edges[slot].score,
                        score = edge.score,
                        "duplicate worker/job labels; overwriting edge score"
                    );
                    edges[slot] = edge;
                }
                None => {
                    edge_slots.insert((worker_node.clone(), job_node.clone()), edges.len());
                    edges.push(edge);
                }
            }
        }
    }

    MatchGraph {
        worker_nodes: unique_labels(workers.iter().map(worker_label), "worker"),
        job_nodes: unique_labels(job_labels.into_iter(), "job"),
        edges,
    }
}
